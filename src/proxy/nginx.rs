// ABOUTME: nginx implementation of the proxy configurator.
// ABOUTME: Writes one vhost file per directory, then runs the check and reload commands.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{ConfigurationError, ProxyConfigurator, Template, VhostParams};
use crate::config::ProxyConfig;
use crate::error::Result;
use crate::types::DeploymentName;

#[derive(Debug, Clone, Copy)]
enum Step {
    Validate,
    Reload,
}

#[derive(Debug, Clone)]
pub struct NginxConfigurator {
    template: Template,
    domain: String,
    directories: Vec<PathBuf>,
    validate: Vec<String>,
    reload: Vec<String>,
}

impl NginxConfigurator {
    /// Load the configured template (or the built-in one).
    pub fn new(config: &ProxyConfig, domain: &str) -> Result<Self> {
        Ok(Self::with_template(config, domain, Self::load_template(config)?))
    }

    /// Read the template named by `config`, falling back to the built-in one.
    /// Blocking; call once at startup.
    pub fn load_template(config: &ProxyConfig) -> Result<Template> {
        Ok(match &config.template {
            Some(path) => Template::new(std::fs::read_to_string(path)?),
            None => Template::builtin(),
        })
    }

    pub fn with_template(config: &ProxyConfig, domain: &str, template: Template) -> Self {
        Self {
            template,
            domain: domain.trim_matches('.').to_string(),
            directories: config.directories.clone(),
            validate: config.validate.clone(),
            reload: config.reload.clone(),
        }
    }

    /// Every path the vhost for `name` is written to.
    pub fn file_paths(&self, name: &DeploymentName) -> Vec<PathBuf> {
        let file = name.config_file_name();
        self.directories.iter().map(|dir| dir.join(&file)).collect()
    }

    async fn write_file(path: &Path, content: &str) -> std::result::Result<(), ConfigurationError> {
        if let Err(e) = tokio::fs::remove_file(path).await {
            debug!(path = %path.display(), error = %e, "no stale vhost removed");
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|source| ConfigurationError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn run(&self, step: Step) -> std::result::Result<(), ConfigurationError> {
        let argv = match step {
            Step::Validate => &self.validate,
            Step::Reload => &self.reload,
        };
        let Some((program, args)) = argv.split_first() else {
            return Ok(());
        };
        let command = argv.join(" ");

        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ConfigurationError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            debug!(%command, "proxy command succeeded");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(%command, exit_code = ?output.status.code(), %stderr, "proxy command failed");
        Err(match step {
            Step::Validate => ConfigurationError::Validate { command, stderr },
            Step::Reload => ConfigurationError::Reload { command, stderr },
        })
    }

    async fn validate_and_reload(&self) -> std::result::Result<(), ConfigurationError> {
        self.run(Step::Validate).await?;
        self.run(Step::Reload).await
    }
}

#[async_trait]
impl ProxyConfigurator for NginxConfigurator {
    async fn configure(
        &self,
        name: &DeploymentName,
        port: u16,
        host_port: u16,
        public_ip: IpAddr,
    ) -> std::result::Result<(), ConfigurationError> {
        let rendered = self.template.render(&VhostParams {
            name: name.as_str(),
            domain: &self.domain,
            port,
            host_port,
            public_ip,
        })?;

        for path in self.file_paths(name) {
            Self::write_file(&path, &rendered).await?;
        }
        info!(%name, directories = self.directories.len(), "vhost written");

        self.validate_and_reload().await?;
        info!(%name, "proxy reloaded");
        Ok(())
    }

    async fn remove(&self, name: &DeploymentName) -> std::result::Result<(), ConfigurationError> {
        for path in self.file_paths(name) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "vhost removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(ConfigurationError::Remove { path, source }),
            }
        }
        self.validate_and_reload().await
    }
}
