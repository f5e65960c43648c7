// ABOUTME: Source host (GitHub) settings.
// ABOUTME: API base for commit lookups, archive base for build tarballs, optional token.

use serde::Deserialize;

use super::EnvValue;

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_archive_url")]
    pub archive_url: String,

    #[serde(default)]
    pub token: Option<EnvValue>,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_archive_url() -> String {
    "https://github.com".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            api_url: default_api_url(),
            archive_url: default_archive_url(),
            token: None,
        }
    }
}
