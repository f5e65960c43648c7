// ABOUTME: Reverse proxy (nginx) settings.
// ABOUTME: Config directories, optional vhost template, validate and reload commands.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Every directory receives an identical copy of the rendered file.
    #[serde(default = "default_directories")]
    pub directories: Vec<PathBuf>,

    /// Template file; the built-in vhost template is used when absent.
    #[serde(default)]
    pub template: Option<PathBuf>,

    #[serde(default = "default_validate")]
    pub validate: Vec<String>,

    #[serde(default = "default_reload")]
    pub reload: Vec<String>,
}

fn default_directories() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/etc/nginx/conf.d"),
        PathBuf::from("/etc/nginx/sites-enabled"),
        PathBuf::from("/etc/nginx/sites-available"),
    ]
}

fn default_validate() -> Vec<String> {
    vec!["nginx".to_string(), "-t".to_string()]
}

fn default_reload() -> Vec<String> {
    vec!["nginx".to_string(), "-s".to_string(), "reload".to_string()]
}

impl Default for ProxyConfig {
    fn default() -> Self {
        ProxyConfig {
            directories: default_directories(),
            template: None,
            validate: default_validate(),
            reload: default_reload(),
        }
    }
}
