// ABOUTME: Validated deployment request.
// ABOUTME: Repository, container port, and environment, fixed once accepted.

use serde::Serialize;
use thiserror::Error;

use crate::types::{EnvAssignment, EnvAssignmentError, RepoRef, RepoRefError, parse_env_list};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENV: &str = "DOCKER=1";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Repo(#[from] RepoRefError),

    #[error(transparent)]
    Env(#[from] EnvAssignmentError),

    #[error("exposed port must be greater than 0")]
    ZeroPort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentRequest {
    repo: RepoRef,
    port: u16,
    env: Vec<EnvAssignment>,
}

impl DeploymentRequest {
    pub fn new(repo: RepoRef, port: u16, env: Vec<EnvAssignment>) -> Result<Self, RequestError> {
        if port == 0 {
            return Err(RequestError::ZeroPort);
        }
        Ok(Self { repo, port, env })
    }

    /// Build a request from raw path/query values; `env_list` is
    /// comma-separated `KEY=VALUE`.
    pub fn parse(owner: &str, repo: &str, port: u16, env_list: &str) -> Result<Self, RequestError> {
        Self::new(RepoRef::new(owner, repo)?, port, parse_env_list(env_list)?)
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    /// Port the application listens on inside the container.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn env(&self) -> &[EnvAssignment] {
        &self.env
    }
}
