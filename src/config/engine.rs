// ABOUTME: Container engine connection settings.
// ABOUTME: Endpoint (unix socket or HTTP URL) and request timeout.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// `unix:///var/run/docker.sock`, a bare socket path, or an
    /// `http://`/`tcp://` address. Absent means the engine's local defaults
    /// (honours `DOCKER_HOST`).
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            host: None,
            timeout: default_timeout(),
        }
    }
}
