// ABOUTME: KEY=VALUE environment assignments forwarded to containers.
// ABOUTME: Parses the comma-separated list accepted by the deploy endpoint.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvAssignmentError {
    #[error("environment entry '{0}' is missing '='")]
    MissingEquals(String),

    #[error("environment entry '{0}' has an empty key")]
    EmptyKey(String),

    #[error("environment key '{0}' contains whitespace")]
    InvalidKey(String),
}

/// One `KEY=VALUE` entry, kept exactly as the caller wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvAssignment {
    raw: String,
    split: usize,
}

impl EnvAssignment {
    pub fn parse(entry: &str) -> Result<Self, EnvAssignmentError> {
        let split = entry
            .find('=')
            .ok_or_else(|| EnvAssignmentError::MissingEquals(entry.to_string()))?;
        let key = &entry[..split];
        if key.is_empty() {
            return Err(EnvAssignmentError::EmptyKey(entry.to_string()));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(EnvAssignmentError::InvalidKey(key.to_string()));
        }
        Ok(Self {
            raw: entry.to_string(),
            split,
        })
    }

    pub fn key(&self) -> &str {
        &self.raw[..self.split]
    }

    pub fn value(&self) -> &str {
        &self.raw[self.split + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for EnvAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for EnvAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Parse a comma-separated `KEY=VALUE` list, preserving order. Empty segments
/// are skipped.
pub fn parse_env_list(list: &str) -> Result<Vec<EnvAssignment>, EnvAssignmentError> {
    list.split(',')
        .filter(|segment| !segment.is_empty())
        .map(EnvAssignment::parse)
        .collect()
}
