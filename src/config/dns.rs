// ABOUTME: DNS provider (Cloudflare) settings.
// ABOUTME: Zone, account credentials, and the record TTL/proxy flags.

use serde::Deserialize;

use super::EnvValue;

#[derive(Debug, Clone, Deserialize)]
pub struct DnsConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    pub zone_id: EnvValue,

    pub email: EnvValue,

    pub api_key: EnvValue,

    /// 1 means "automatic" to Cloudflare.
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    #[serde(default = "default_proxied")]
    pub proxied: bool,
}

fn default_api_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_ttl() -> u32 {
    1
}

fn default_proxied() -> bool {
    true
}

impl Default for DnsConfig {
    fn default() -> Self {
        DnsConfig {
            api_url: default_api_url(),
            zone_id: EnvValue::from_env("CF_ZONE_ID"),
            email: EnvValue::from_env("CF_EMAIL"),
            api_key: EnvValue::from_env("CF_API_KEY"),
            ttl: default_ttl(),
            proxied: default_proxied(),
        }
    }
}
