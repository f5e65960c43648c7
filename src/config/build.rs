// ABOUTME: Image build settings.
// ABOUTME: Dockerfile location inside the source archive, time limit, extra build args.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Path of the Dockerfile relative to the repository root.
    #[serde(default = "default_dockerfile")]
    pub dockerfile: String,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

fn default_dockerfile() -> String {
    "Dockerfile".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30 * 60)
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            dockerfile: default_dockerfile(),
            timeout: default_timeout(),
            args: BTreeMap::new(),
        }
    }
}
