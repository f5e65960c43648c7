// ABOUTME: Phantom-typed identifiers for engine and DNS resources.
// ABOUTME: Keeps container, image, and DNS record ids from being swapped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
pub enum ContainerMarker {}
pub enum ImageMarker {}
pub enum DnsRecordMarker {}

/// An opaque identifier handed out by an external system.
///
/// The marker parameter means a `ContainerId` can never be passed where an
/// `ImageId` or `DnsRecordId` is expected.
///
/// ```compile_fail
/// use dockhand::types::{ContainerId, ImageId};
///
/// fn remove(_id: ContainerId) {}
///
/// remove(ImageId::new("sha256:deadbeef"));
/// ```
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// First 12 characters, the form engines print in their own output.
    pub fn short(&self) -> &str {
        let raw = self.value.strip_prefix("sha256:").unwrap_or(&self.value);
        match raw.char_indices().nth(12) {
            Some((idx, _)) => &raw[..idx],
            None => raw,
        }
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// Manual impls so T needs no bounds.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

pub type ContainerId = Id<ContainerMarker>;
pub type ImageId = Id<ImageMarker>;
pub type DnsRecordId = Id<DnsRecordMarker>;
