// ABOUTME: Error types for deployment operations.
// ABOUTME: One variant per pipeline component, plus the phase each belongs to.

use serde::Serialize;
use serde_json::Value;

use crate::build::BuildError;
use crate::dns::RegistrationError;
use crate::provision::ProvisionError;
use crate::proxy::ConfigurationError;
use crate::source::ResolveError;

/// Errors that can occur during deployment state transitions.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("commit resolution failed: {0}")]
    Resolution(#[from] ResolveError),

    #[error("image build failed: {0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Provision(#[from] ProvisionError),

    #[error("DNS registration failed: {0}")]
    Registration(#[from] RegistrationError),

    #[error("proxy configuration failed: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeployErrorKind {
    ResolutionError,
    BuildError,
    ProvisionError,
    RegistrationError,
    ConfigurationError,
}

/// Pipeline step a deployment was in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Resolving,
    Building,
    Provisioning,
    Registering,
    Configuring,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Resolving => "resolving",
            Phase::Building => "building",
            Phase::Provisioning => "provisioning",
            Phase::Registering => "registering",
            Phase::Configuring => "configuring",
        };
        f.write_str(s)
    }
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Resolution(_) => DeployErrorKind::ResolutionError,
            DeployError::Build(_) => DeployErrorKind::BuildError,
            DeployError::Provision(_) => DeployErrorKind::ProvisionError,
            DeployError::Registration(_) => DeployErrorKind::RegistrationError,
            DeployError::Configuration(_) => DeployErrorKind::ConfigurationError,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            DeployError::Resolution(_) => Phase::Resolving,
            DeployError::Build(_) => Phase::Building,
            DeployError::Provision(_) => Phase::Provisioning,
            DeployError::Registration(_) => Phase::Registering,
            DeployError::Configuration(_) => Phase::Configuring,
        }
    }

    /// Upstream payload worth handing back to the caller verbatim.
    pub fn raw(&self) -> Option<Value> {
        match self {
            DeployError::Provision(e) => e.raw.clone(),
            DeployError::Registration(e) => e.raw(),
            _ => None,
        }
    }

    pub fn log_tail(&self) -> Option<&str> {
        match self {
            DeployError::Build(e) => e.log_tail(),
            _ => None,
        }
    }
}
