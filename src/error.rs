// ABOUTME: Application-wide error types for dockhand.
// ABOUTME: Covers configuration, I/O, and component wiring failures.

use std::path::PathBuf;
use thiserror::Error;

use crate::runtime::RuntimeError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("deployment failed: {0}")]
    DeploymentFailed(String),

    #[error("container engine unavailable: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
