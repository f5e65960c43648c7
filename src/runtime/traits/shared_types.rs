// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: ContainerSpec, ContainerInfo, BuildRequest, PullProgress, etc.

use crate::types::ImageId;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// What to create.
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    /// Container name.
    pub name: String,
    /// Image to run.
    pub image: ImageId,
    /// `KEY=VALUE` entries, passed through untouched.
    pub env: Vec<String>,
    /// Published ports.
    pub ports: Vec<PortMapping>,
}

/// A container port published on the host over TCP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host_port: u16,
    pub container_port: u16,
}

impl PortMapping {
    pub fn tcp(container_port: u16, host_port: u16) -> Self {
        Self {
            host_port,
            container_port,
        }
    }

    /// Engine key, e.g. `8080/tcp`.
    pub fn key(&self) -> String {
        format!("{}/tcp", self.container_port)
    }
}

/// Container state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

/// Inspect result: parsed state plus the full engine document.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub state: ContainerState,
    pub details: Value,
}

/// A build whose context the engine fetches itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// URL of the context tarball.
    pub remote: String,
    /// Dockerfile path inside the context.
    pub dockerfile: String,
    /// Tag for the resulting image.
    pub tag: String,
    pub build_args: HashMap<String, String>,
}

/// One pull progress message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullProgress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}
