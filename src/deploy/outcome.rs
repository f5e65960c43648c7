// ABOUTME: Terminal results of a deployment run.
// ABOUTME: Done with the public result, Aborted before side effects, PartialFailure after.

use serde::Serialize;

use crate::diagnostics::Warning;
use crate::dns::DnsRecord;
use crate::provision::ContainerInstance;
use crate::proxy::ConfigurationError;
use crate::types::{CommitSha, ContainerId, DeploymentName, ImageId};

use super::error::{DeployError, Phase};

/// What a successful deployment hands back.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentResult {
    /// Public hostname, `{name}.{domain}`.
    pub url: String,
    /// Host port, as a string.
    pub port: String,
    pub container: ContainerInstance,
    pub dns: DnsRecord,
    pub name: DeploymentName,
    pub commit: CommitSha,
    pub image: ImageId,
}

/// External resources a deployment created before it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_record: Option<DnsRecord>,
    /// Name whose proxy files may be on disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_files: Option<DeploymentName>,
}

impl Resources {
    /// Add what the failing step itself left behind.
    pub fn absorb(&mut self, name: &DeploymentName, error: &DeployError) {
        match error {
            DeployError::Provision(e) => {
                if let Some(id) = &e.container_id {
                    self.container = Some(id.clone());
                }
            }
            DeployError::Configuration(ConfigurationError::Template(_)) => {}
            DeployError::Configuration(_) => self.proxy_files = Some(name.clone()),
            _ => {}
        }
    }
}

/// One cleanup step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationAction {
    RemoveProxyFiles,
    DeleteDnsRecord,
    RemoveContainer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompensationRecord {
    pub action: CompensationAction,
    pub target: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// How a deployment run ended.
#[derive(Debug)]
pub enum DeployOutcome {
    Done(DeploymentResult),
    /// Failed before anything external was created.
    Aborted {
        name: DeploymentName,
        error: DeployError,
    },
    /// Failed after resources were created.
    PartialFailure {
        name: DeploymentName,
        error: DeployError,
        resources: Resources,
        compensation: Vec<CompensationRecord>,
        warnings: Vec<Warning>,
    },
}

impl DeployOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, DeployOutcome::Done(_))
    }

    pub fn name(&self) -> &DeploymentName {
        match self {
            DeployOutcome::Done(result) => &result.name,
            DeployOutcome::Aborted { name, .. } | DeployOutcome::PartialFailure { name, .. } => {
                name
            }
        }
    }

    pub fn error(&self) -> Option<&DeployError> {
        match self {
            DeployOutcome::Done(_) => None,
            DeployOutcome::Aborted { error, .. } | DeployOutcome::PartialFailure { error, .. } => {
                Some(error)
            }
        }
    }

    /// Phase the run stopped in; `None` when it finished.
    pub fn phase(&self) -> Option<Phase> {
        self.error().map(DeployError::phase)
    }
}
