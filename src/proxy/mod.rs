// ABOUTME: Reverse-proxy virtual hosts for deployments.
// ABOUTME: Configurator trait, vhost template rendering, and the nginx implementation.

mod nginx;
mod template;

pub use nginx::NginxConfigurator;
pub use template::{DEFAULT_TEMPLATE, Template, TemplateError, VhostParams};

use std::net::IpAddr;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::DeploymentName;

/// Publishes a deployment's hostname through the reverse proxy.
#[async_trait]
pub trait ProxyConfigurator: Send + Sync {
    /// Render and write the vhost, then validate and reload the proxy. Files
    /// stay written when validation or reload fails.
    async fn configure(
        &self,
        name: &DeploymentName,
        port: u16,
        host_port: u16,
        public_ip: IpAddr,
    ) -> Result<(), ConfigurationError>;

    /// Delete the vhost files for `name` and reload. Missing files are fine.
    async fn remove(&self, name: &DeploymentName) -> Result<(), ConfigurationError>;
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("proxy configuration check failed ({command}): {stderr}")]
    Validate { command: String, stderr: String },

    #[error("proxy reload failed ({command}): {stderr}")]
    Reload { command: String, stderr: String },
}
