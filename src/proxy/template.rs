// ABOUTME: Minimal `{{placeholder}}` templating for vhost files.
// ABOUTME: Unknown or unterminated placeholders are errors, not blanks.

use std::net::IpAddr;

use thiserror::Error;

pub const DEFAULT_TEMPLATE: &str = r#"# {{name}}: container port {{port}} on host port {{host_port}}, DNS -> {{public_ip}}
server {
    listen 80;
    listen [::]:80;
    server_name {{name}}.{{domain}};

    location / {
        proxy_pass http://127.0.0.1:{{host_port}};
        proxy_http_version 1.1;
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
        proxy_set_header Upgrade $http_upgrade;
        proxy_set_header Connection "upgrade";
    }
}
"#;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder '{0}'")]
    UnknownPlaceholder(String),

    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// Values a vhost template may reference.
#[derive(Debug, Clone)]
pub struct VhostParams<'a> {
    pub name: &'a str,
    pub domain: &'a str,
    pub port: u16,
    pub host_port: u16,
    pub public_ip: IpAddr,
}

impl VhostParams<'_> {
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "name" => Some(self.name.to_string()),
            "domain" => Some(self.domain.to_string()),
            "port" => Some(self.port.to_string()),
            "host_port" | "hostPort" => Some(self.host_port.to_string()),
            "public_ip" => Some(self.public_ip.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }

    pub fn render(&self, params: &VhostParams<'_>) -> Result<String, TemplateError> {
        let src = self.source.as_str();
        let mut out = String::with_capacity(src.len() + 64);
        let mut pos = 0;

        while let Some(open) = src[pos..].find("{{") {
            let open = pos + open;
            out.push_str(&src[pos..open]);
            let inner_start = open + 2;
            let close = src[inner_start..]
                .find("}}")
                .map(|i| inner_start + i)
                .ok_or(TemplateError::Unterminated(open))?;
            let key = src[inner_start..close].trim();
            let value = params
                .lookup(key)
                .ok_or_else(|| TemplateError::UnknownPlaceholder(key.to_string()))?;
            out.push_str(&value);
            pos = close + 2;
        }
        out.push_str(&src[pos..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn params() -> VhostParams<'static> {
        VhostParams {
            name: "acme-widget-0000beef",
            domain: "example.com",
            port: 8080,
            host_port: 54321,
            public_ip: IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)),
        }
    }

    #[test]
    fn substitutes_with_and_without_spaces() {
        let t = Template::new("{{name}}.{{ domain }}:{{host_port}}/{{port}} {{public_ip}}");
        assert_eq!(
            t.render(&params()).unwrap(),
            "acme-widget-0000beef.example.com:54321/8080 203.0.113.7"
        );
    }

    #[test]
    fn builtin_template_routes_to_host_port() {
        let rendered = Template::builtin().render(&params()).unwrap();
        assert!(rendered.contains("server_name acme-widget-0000beef.example.com;"));
        assert!(rendered.contains("proxy_pass http://127.0.0.1:54321;"));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let t = Template::new("{{nope}}");
        assert_eq!(
            t.render(&params()),
            Err(TemplateError::UnknownPlaceholder("nope".to_string()))
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        assert_eq!(
            Template::new("abc {{name").render(&params()),
            Err(TemplateError::Unterminated(4))
        );
    }
}
