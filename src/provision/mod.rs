// ABOUTME: Container provisioning from a built image.
// ABOUTME: Port allocation, create, start, and inspect, each its own failure stage.

mod engine_provisioner;

pub use engine_provisioner::EngineProvisioner;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::build::BuildArtifact;
use crate::runtime::ContainerState;
use crate::types::{ContainerId, DeploymentName, EnvAssignment};

/// Starts containers for built images.
#[async_trait]
pub trait ContainerProvisioner: Send + Sync {
    /// Create and start a container named `name`, publishing `exposed_port`
    /// on a freshly allocated host port.
    async fn provision(
        &self,
        artifact: &BuildArtifact,
        name: &DeploymentName,
        exposed_port: u16,
        env: &[EnvAssignment],
    ) -> Result<ContainerInstance, ProvisionError>;

    /// Force-remove a container.
    async fn remove(&self, id: &ContainerId) -> Result<(), ProvisionError>;
}

/// How far provisioning got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceState {
    Created,
    Started,
    Inspected,
}

/// A provisioned container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerInstance {
    pub id: ContainerId,
    pub host_port: u16,
    pub state: InstanceState,
    /// Engine-reported state from the last inspect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_state: Option<ContainerState>,
    /// Inspect document, `null` until inspected.
    pub details: Value,
}

impl ContainerInstance {
    pub fn created(id: ContainerId, host_port: u16) -> Self {
        Self {
            id,
            host_port,
            state: InstanceState::Created,
            engine_state: None,
            details: Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisionStage {
    Allocate,
    Create,
    Start,
    Inspect,
    Remove,
}

impl fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProvisionStage::Allocate => "port allocation",
            ProvisionStage::Create => "create",
            ProvisionStage::Start => "start",
            ProvisionStage::Inspect => "inspect",
            ProvisionStage::Remove => "remove",
        };
        f.write_str(s)
    }
}

/// Provisioning failure.
///
/// `raw` holds the engine's create response (or its error body) whenever one
/// was received, so callers can reconcile by hand.
#[derive(Debug, Clone, Error)]
#[error("container {stage} failed: {message}")]
pub struct ProvisionError {
    pub stage: ProvisionStage,
    pub message: String,
    pub raw: Option<Value>,
    /// Set once the engine has created the container.
    pub container_id: Option<ContainerId>,
}

impl ProvisionError {
    pub fn new(stage: ProvisionStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            raw: None,
            container_id: None,
        }
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn with_container(mut self, id: ContainerId) -> Self {
        self.container_id = Some(id);
        self
    }
}
