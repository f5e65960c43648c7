// ABOUTME: Container operations trait for the container engine.
// ABOUTME: Create, start, inspect, and remove containers.

use super::shared_types::{ContainerInfo, ContainerSpec};
use crate::types::ContainerId;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Container lifecycle operations.
#[async_trait]
pub trait ContainerOps: Send + Sync {
    /// Create a container. Returns the engine's response document as-is so
    /// callers can surface it when it lacks what they need.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<Value, ContainerError>;

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerInfo, ContainerError>;

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError>;
}

/// Errors from container operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    /// The engine answered with an error status.
    #[error("engine rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A success response the client could not decode; `contents` is the
    /// payload exactly as received.
    #[error("malformed engine response: {message}")]
    Malformed { message: String, contents: String },

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl ContainerError {
    /// The error as the engine would have sent it.
    pub fn body(&self) -> Value {
        match self {
            ContainerError::NotFound(message)
            | ContainerError::Rejected { message, .. }
            | ContainerError::Runtime(message) => json!({ "message": message }),
            ContainerError::Malformed { contents, .. } => serde_json::from_str(contents)
                .unwrap_or_else(|_| Value::String(contents.clone())),
        }
    }
}
