// ABOUTME: Cloudflare DNS API client.
// ABOUTME: Creates and deletes A records in one zone with account-key auth.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{DnsRecord, DnsRegistrar, RegistrationError};
use crate::config::DnsConfig;
use crate::error::Result;
use crate::types::{DeploymentName, DnsRecordId};

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    #[serde(default)]
    result: Option<Value>,
}

#[derive(Deserialize)]
struct CreatedRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    content: String,
    ttl: u32,
    #[serde(default)]
    proxied: bool,
}

/// Cloudflare client scoped to one zone.
#[derive(Debug, Clone)]
pub struct CloudflareClient {
    client: Client,
    api_url: String,
    zone_id: String,
    email: String,
    api_key: String,
    public_ip: IpAddr,
    ttl: u32,
    proxied: bool,
}

impl CloudflareClient {
    pub fn new(config: &DnsConfig, public_ip: IpAddr, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            zone_id: config.zone_id.resolve()?,
            email: config.email.resolve()?,
            api_key: config.api_key.resolve()?,
            public_ip,
            ttl: config.ttl,
            proxied: config.proxied,
        })
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", self.api_url, self.zone_id)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("X-Auth-Email", &self.email)
            .header("X-Auth-Key", &self.api_key)
    }

    /// Read a Cloudflare envelope, failing on HTTP or API-level errors.
    async fn envelope(
        response: reqwest::Response,
    ) -> std::result::Result<(Envelope, Value), RegistrationError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RegistrationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value =
            serde_json::from_str(&body).map_err(|e| RegistrationError::Malformed(e.to_string()))?;
        let envelope: Envelope = serde_json::from_value(raw.clone())
            .map_err(|e| RegistrationError::Malformed(e.to_string()))?;

        if !envelope.success {
            let message = envelope
                .errors
                .iter()
                .map(|e| match e.code {
                    Some(code) => format!("{} ({})", e.message, code),
                    None => e.message.clone(),
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RegistrationError::Rejected { message, body: raw });
        }
        Ok((envelope, raw))
    }
}

#[async_trait]
impl DnsRegistrar for CloudflareClient {
    async fn register(
        &self,
        name: &DeploymentName,
    ) -> std::result::Result<DnsRecord, RegistrationError> {
        let payload = json!({
            "type": "A",
            "name": name.as_str(),
            "content": self.public_ip.to_string(),
            "ttl": self.ttl,
            "proxied": self.proxied,
        });

        let response = self
            .authed(self.client.post(self.records_url()))
            .json(&payload)
            .send()
            .await?;
        let (envelope, raw) = Self::envelope(response).await?;

        let result = envelope.result.ok_or_else(|| {
            RegistrationError::Malformed(format!("response has no result: {}", raw))
        })?;
        let created: CreatedRecord = serde_json::from_value(result)
            .map_err(|e| RegistrationError::Malformed(e.to_string()))?;

        tracing::info!(record = %created.id, name = %created.name, "DNS record created");
        Ok(DnsRecord {
            id: DnsRecordId::new(created.id),
            record_type: created.record_type,
            name: created.name,
            content: created.content,
            ttl: created.ttl,
            proxied: created.proxied,
        })
    }

    async fn deregister(&self, record: &DnsRecord) -> std::result::Result<(), RegistrationError> {
        let url = format!("{}/{}", self.records_url(), record.id);
        let response = self.authed(self.client.delete(&url)).send().await?;
        Self::envelope(response).await?;

        tracing::info!(record = %record.id, name = %record.name, "DNS record deleted");
        Ok(())
    }
}
