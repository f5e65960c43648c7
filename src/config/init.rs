// ABOUTME: Config scaffolding for new hosts.
// ABOUTME: Creates a commented dockhand.yml template.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config};

pub fn init_config(dir: &Path, domain: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(d) = domain {
        if d.trim().is_empty() || d.contains('/') {
            return Err(Error::InvalidConfig(format!("invalid domain: {d}")));
        }
        config.domain = d.trim_matches('.').to_string();
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let directories = config
        .proxy
        .directories
        .iter()
        .map(|d| format!("    - {}", d.display()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"domain: {domain}
public_ip: {{ env: IP_ADDR }}
# keep: leave resources from failed deployments in place (reported as warnings)
# compensate: remove them again, newest first
cleanup: {cleanup}

engine:
  # unix:///var/run/docker.sock or http://localhost:2375
  # host: unix:///var/run/docker.sock
  timeout: 120s

source:
  api_url: {api_url}
  archive_url: {archive_url}
  # raises the API rate limit; unauthenticated lookups work without it
  # token: {{ env: GITHUB_TOKEN }}

build:
  dockerfile: {dockerfile}
  timeout: 30m

dns:
  zone_id: {{ env: CF_ZONE_ID }}
  email: {{ env: CF_EMAIL }}
  api_key: {{ env: CF_API_KEY }}
  ttl: {ttl}
  proxied: {proxied}

proxy:
  directories:
{directories}
  # template: templates/nginx.conf
  validate: [nginx, -t]
  reload: [nginx, -s, reload]

server:
  bind: {bind}
"#,
        domain = config.domain,
        cleanup = config.cleanup,
        api_url = config.source.api_url,
        archive_url = config.source.archive_url,
        dockerfile = config.build.dockerfile,
        ttl = config.dns.ttl,
        proxied = config.dns.proxied,
        directories = directories,
        bind = config.server.bind,
    )
}
