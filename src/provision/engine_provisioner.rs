// ABOUTME: Container provisioner over the engine's container endpoints.
// ABOUTME: Surfaces the raw create response whenever a later step fails.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::{
    ContainerInstance, ContainerProvisioner, InstanceState, ProvisionError, ProvisionStage,
};
use crate::build::BuildArtifact;
use crate::runtime::{ContainerOps, ContainerSpec, PortAllocator, PortMapping};
use crate::types::{ContainerId, DeploymentName, EnvAssignment};

pub struct EngineProvisioner<E, P> {
    engine: E,
    ports: P,
}

impl<E: ContainerOps, P: PortAllocator> EngineProvisioner<E, P> {
    pub fn new(engine: E, ports: P) -> Self {
        Self { engine, ports }
    }
}

fn container_id(created: &Value) -> Option<ContainerId> {
    created
        .get("Id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map(ContainerId::new)
}

#[async_trait]
impl<E: ContainerOps, P: PortAllocator> ContainerProvisioner for EngineProvisioner<E, P> {
    async fn provision(
        &self,
        artifact: &BuildArtifact,
        name: &DeploymentName,
        exposed_port: u16,
        env: &[EnvAssignment],
    ) -> Result<ContainerInstance, ProvisionError> {
        let host_port = self
            .ports
            .allocate()
            .map_err(|e| ProvisionError::new(ProvisionStage::Allocate, e.to_string()))?;
        debug!(host_port, exposed_port, "publishing container port");

        let spec = ContainerSpec {
            name: name.to_string(),
            image: artifact.image_id().clone(),
            env: env.iter().map(|e| e.as_str().to_string()).collect(),
            ports: vec![PortMapping::tcp(exposed_port, host_port)],
        };

        let created = self
            .engine
            .create_container(&spec)
            .await
            .map_err(|e| ProvisionError::new(ProvisionStage::Create, e.to_string()).with_raw(e.body()))?;

        let Some(id) = container_id(&created) else {
            return Err(
                ProvisionError::new(ProvisionStage::Create, "create response has no container Id")
                    .with_raw(created),
            );
        };
        info!(container = %id.short(), host_port, "container created");

        let mut instance = ContainerInstance::created(id.clone(), host_port);

        self.engine.start_container(&id).await.map_err(|e| {
            ProvisionError::new(ProvisionStage::Start, e.to_string())
                .with_raw(created.clone())
                .with_container(id.clone())
        })?;
        instance.state = InstanceState::Started;

        let inspected = self.engine.inspect_container(&id).await.map_err(|e| {
            ProvisionError::new(ProvisionStage::Inspect, e.to_string())
                .with_raw(created.clone())
                .with_container(id.clone())
        })?;
        instance.state = InstanceState::Inspected;
        instance.engine_state = Some(inspected.state);
        instance.details = inspected.details;

        info!(container = %id.short(), state = ?inspected.state, "container started");
        Ok(instance)
    }

    async fn remove(&self, id: &ContainerId) -> Result<(), ProvisionError> {
        self.engine.remove_container(id, true).await.map_err(|e| {
            ProvisionError::new(ProvisionStage::Remove, e.to_string())
                .with_raw(e.body())
                .with_container(id.clone())
        })
    }
}
