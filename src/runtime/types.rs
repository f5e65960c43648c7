// ABOUTME: Engine endpoint parsing.
// ABOUTME: Maps the configured host string onto a bollard connection method.

use std::fmt;

use super::error::{EndpointSnafu, RuntimeError};

/// Where the container engine listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEndpoint {
    /// Let the engine client pick (`DOCKER_HOST` or the platform socket).
    LocalDefaults,
    /// Unix socket path.
    Unix(String),
    /// Plain HTTP/TCP address.
    Http(String),
}

impl EngineEndpoint {
    pub fn parse(host: Option<&str>) -> Result<Self, RuntimeError> {
        let Some(host) = host.map(str::trim).filter(|h| !h.is_empty()) else {
            return Ok(EngineEndpoint::LocalDefaults);
        };

        if let Some(path) = host.strip_prefix("unix://") {
            if path.is_empty() {
                return EndpointSnafu {
                    endpoint: host,
                    reason: "missing socket path",
                }
                .fail();
            }
            return Ok(EngineEndpoint::Unix(path.to_string()));
        }
        if host.starts_with('/') {
            return Ok(EngineEndpoint::Unix(host.to_string()));
        }
        if host.starts_with("http://") || host.starts_with("tcp://") {
            return Ok(EngineEndpoint::Http(host.to_string()));
        }
        if host.starts_with("https://") {
            return EndpointSnafu {
                endpoint: host,
                reason: "TLS engine endpoints are not supported",
            }
            .fail();
        }

        EndpointSnafu {
            endpoint: host,
            reason: "expected unix://, an absolute socket path, http:// or tcp://",
        }
        .fail()
    }
}

impl fmt::Display for EngineEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineEndpoint::LocalDefaults => write!(f, "local defaults"),
            EngineEndpoint::Unix(path) => write!(f, "unix://{}", path),
            EngineEndpoint::Http(addr) => write!(f, "{}", addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_host_uses_local_defaults() {
        assert_eq!(EngineEndpoint::parse(None).unwrap(), EngineEndpoint::LocalDefaults);
        assert_eq!(
            EngineEndpoint::parse(Some("  ")).unwrap(),
            EngineEndpoint::LocalDefaults
        );
    }

    #[test]
    fn unix_forms() {
        assert_eq!(
            EngineEndpoint::parse(Some("unix:///var/run/docker.sock")).unwrap(),
            EngineEndpoint::Unix("/var/run/docker.sock".to_string())
        );
        assert_eq!(
            EngineEndpoint::parse(Some("/run/podman/podman.sock")).unwrap(),
            EngineEndpoint::Unix("/run/podman/podman.sock".to_string())
        );
    }

    #[test]
    fn rejects_unknown_schemes() {
        assert!(EngineEndpoint::parse(Some("ssh://host")).is_err());
        assert!(EngineEndpoint::parse(Some("https://host:2376")).is_err());
        assert!(EngineEndpoint::parse(Some("unix://")).is_err());
    }
}
