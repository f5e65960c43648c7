// ABOUTME: Configuration types and parsing for dockhand.yml.
// ABOUTME: Handles YAML parsing, file discovery, env-backed secrets, and startup checks.

mod build;
mod cleanup_policy;
mod dns;
mod engine;
mod env_value;
mod init;
mod proxy;
mod server;
mod source;

pub use build::BuildConfig;
pub use cleanup_policy::CleanupPolicy;
pub use dns::DnsConfig;
pub use engine::EngineConfig;
pub use env_value::{EnvValue, resolve_optional};
pub use init::init_config;
pub use proxy::ProxyConfig;
pub use server::ServerConfig;
pub use source::SourceConfig;

use crate::error::{Error, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "dockhand.yml";
pub const CONFIG_FILENAME_ALT: &str = "dockhand.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".dockhand/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Public zone; deployments are reachable at `{name}.{domain}`.
    pub domain: String,

    /// Address the DNS records point at.
    pub public_ip: EnvValue,

    #[serde(default)]
    pub cleanup: CleanupPolicy,

    /// Timeout for source host and DNS provider requests.
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    pub http_timeout: Duration,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Resolve and parse the public IP.
    pub fn public_ip(&self) -> Result<IpAddr> {
        let raw = self.public_ip.resolve()?;
        raw.trim()
            .parse()
            .map_err(|_| Error::InvalidConfig(format!("public_ip is not an IP address: {raw}")))
    }

    /// Resolve every secret and sanity-check the settings, so a bad config
    /// fails at startup rather than halfway through a deployment.
    pub fn check(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(Error::InvalidConfig("domain cannot be empty".to_string()));
        }
        self.public_ip()?;
        resolve_optional(self.source.token.as_ref())?;
        self.dns.zone_id.resolve()?;
        self.dns.email.resolve()?;
        self.dns.api_key.resolve()?;

        if self.proxy.directories.is_empty() {
            return Err(Error::InvalidConfig(
                "proxy.directories needs at least one directory".to_string(),
            ));
        }
        if self.proxy.reload.is_empty() {
            return Err(Error::InvalidConfig(
                "proxy.reload cannot be empty".to_string(),
            ));
        }
        if self.build.dockerfile.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "build.dockerfile cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn template() -> Self {
        Config {
            domain: "example.com".to_string(),
            public_ip: EnvValue::from_env("IP_ADDR"),
            cleanup: CleanupPolicy::default(),
            http_timeout: default_http_timeout(),
            engine: EngineConfig::default(),
            source: SourceConfig::default(),
            build: BuildConfig::default(),
            dns: DnsConfig::default(),
            proxy: ProxyConfig::default(),
            server: ServerConfig::default(),
        }
    }
}
