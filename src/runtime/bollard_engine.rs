// ABOUTME: Bollard-based container engine implementation.
// ABOUTME: Works against Docker and any engine speaking the Docker API.

use crate::config::EngineConfig;
use crate::runtime::error::{ConnectionSnafu, RuntimeError};
use crate::runtime::traits::{
    BuildRequest, BuildStream, ContainerError, ContainerInfo, ContainerOps, ContainerSpec,
    ContainerState, ImageError, ImageOps, PullProgress, PullStream,
};
use crate::runtime::types::EngineEndpoint;
use crate::types::ContainerId;
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{
    ContainerCreateBody, ContainerStateStatusEnum, HostConfig, PortBinding, ProgressDetail,
};
use bollard::query_parameters::{
    BuildImageOptionsBuilder, CreateContainerOptions, CreateImageOptions,
    InspectContainerOptions, RemoveContainerOptions, StartContainerOptions,
};
use futures::StreamExt;
use serde_json::Value;
use snafu::ResultExt;
use std::collections::HashMap;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_container_error(e: bollard::errors::Error) -> ContainerError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if status_code == 404 => ContainerError::NotFound(message),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => ContainerError::Rejected {
            status: status_code,
            message,
        },
        bollard::errors::Error::JsonDataError {
            message, contents, ..
        } => ContainerError::Malformed { message, contents },
        other => ContainerError::Runtime(other.to_string()),
    }
}

fn map_build_error(e: bollard::errors::Error) -> ImageError {
    match e {
        bollard::errors::Error::DockerStreamError { error } => ImageError::BuildFailed(error),
        other => ImageError::Runtime(other.to_string()),
    }
}

fn map_pull_error(e: bollard::errors::Error, reference: &str) -> ImageError {
    ImageError::PullFailed(format!("{}: {}", reference, e))
}

/// `current/total` as the CLI shows it, or just `current` when the total is
/// unknown.
fn progress_text(detail: ProgressDetail) -> Option<String> {
    match (detail.current, detail.total) {
        (Some(current), Some(total)) if total > 0 => Some(format!("{current}/{total}")),
        (Some(current), _) => Some(current.to_string()),
        _ => None,
    }
}

fn parse_state(status: Option<ContainerStateStatusEnum>) -> ContainerState {
    match status {
        Some(ContainerStateStatusEnum::CREATED) => ContainerState::Created,
        Some(ContainerStateStatusEnum::RUNNING) => ContainerState::Running,
        Some(ContainerStateStatusEnum::PAUSED) => ContainerState::Paused,
        Some(ContainerStateStatusEnum::RESTARTING) => ContainerState::Restarting,
        Some(ContainerStateStatusEnum::REMOVING) => ContainerState::Removing,
        Some(ContainerStateStatusEnum::EXITED) => ContainerState::Exited,
        Some(ContainerStateStatusEnum::DEAD) => ContainerState::Dead,
        _ => ContainerState::Unknown,
    }
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Container engine client using bollard.
#[derive(Debug, Clone)]
pub struct BollardRuntime {
    client: Docker,
    endpoint: EngineEndpoint,
}

impl BollardRuntime {
    /// Create a BollardRuntime from an existing client.
    pub fn new(client: Docker, endpoint: EngineEndpoint) -> Self {
        Self { client, endpoint }
    }

    /// Open a client for the configured endpoint. No request is made yet.
    pub fn connect(config: &EngineConfig) -> Result<Self, RuntimeError> {
        let endpoint = EngineEndpoint::parse(config.host.as_deref())?;
        let timeout = config.timeout.as_secs();

        let client = match &endpoint {
            EngineEndpoint::LocalDefaults => Docker::connect_with_local_defaults(),
            EngineEndpoint::Unix(path) => {
                Docker::connect_with_unix(path, timeout, bollard::API_DEFAULT_VERSION)
            }
            EngineEndpoint::Http(addr) => {
                Docker::connect_with_http(addr, timeout, bollard::API_DEFAULT_VERSION)
            }
        }
        .context(ConnectionSnafu {
            endpoint: endpoint.to_string(),
        })?;

        Ok(Self::new(client.with_timeout(config.timeout), endpoint))
    }

    pub fn endpoint(&self) -> &EngineEndpoint {
        &self.endpoint
    }

    /// Check that the engine answers.
    pub async fn ping(&self) -> Result<(), RuntimeError> {
        self.client.ping().await.context(ConnectionSnafu {
            endpoint: self.endpoint.to_string(),
        })?;
        Ok(())
    }
}

// =============================================================================
// ImageOps
// =============================================================================

impl ImageOps for BollardRuntime {
    fn build_image(&self, request: &BuildRequest) -> BuildStream<'_> {
        let options = BuildImageOptionsBuilder::default()
            .dockerfile(&request.dockerfile)
            .t(&request.tag)
            .remote(&request.remote)
            .buildargs(&request.build_args)
            .rm(true)
            .build();

        let stream = self
            .client
            .build_image(options, None, None)
            .map(|item| match item {
                Ok(info) => match info.error_detail.and_then(|d| d.message) {
                    Some(message) => Err(ImageError::BuildFailed(message)),
                    None => Ok(info.stream.unwrap_or_default()),
                },
                Err(e) => Err(map_build_error(e)),
            });

        Box::pin(stream)
    }

    fn pull_image(&self, reference: &str) -> PullStream<'_> {
        let opts = CreateImageOptions {
            from_image: Some(reference.to_string()),
            ..Default::default()
        };
        let reference = reference.to_string();

        let stream = self
            .client
            .create_image(Some(opts), None, None)
            .map(move |item| match item {
                Ok(info) => match info.error_detail.and_then(|d| d.message) {
                    Some(message) => Err(ImageError::PullFailed(message)),
                    None => Ok(PullProgress {
                        id: info.id,
                        status: info.status.unwrap_or_default(),
                        progress: info.progress_detail.and_then(progress_text),
                    }),
                },
                Err(e) => Err(map_pull_error(e, &reference)),
            });

        Box::pin(stream)
    }
}

// =============================================================================
// ContainerOps
// =============================================================================

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn create_container(&self, spec: &ContainerSpec) -> Result<Value, ContainerError> {
        let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
        let mut exposed_ports: Vec<String> = Vec::new();
        for port in &spec.ports {
            let key = port.key();
            exposed_ports.push(key.clone());
            port_bindings.insert(
                key,
                Some(vec![PortBinding {
                    host_ip: None,
                    host_port: Some(port.host_port.to_string()),
                }]),
            );
        }

        let body = ContainerCreateBody {
            image: Some(spec.image.as_str().to_string()),
            env: if spec.env.is_empty() {
                None
            } else {
                Some(spec.env.clone())
            },
            exposed_ports: if exposed_ports.is_empty() {
                None
            } else {
                Some(exposed_ports)
            },
            host_config: Some(HostConfig {
                port_bindings: if port_bindings.is_empty() {
                    None
                } else {
                    Some(port_bindings)
                },
                ..Default::default()
            }),
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: Some(spec.name.clone()),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), body)
            .await
            .map_err(map_container_error)?;

        serde_json::to_value(&response).map_err(|e| ContainerError::Runtime(e.to_string()))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
            .map_err(map_container_error)
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerInfo, ContainerError> {
        let details = self
            .client
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(map_container_error)?;

        let state = parse_state(details.state.as_ref().and_then(|s| s.status));
        let details =
            serde_json::to_value(&details).map_err(|e| ContainerError::Runtime(e.to_string()))?;

        Ok(ContainerInfo { state, details })
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_error)
    }
}
