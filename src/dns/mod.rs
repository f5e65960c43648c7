// ABOUTME: DNS registration for deployment hostnames.
// ABOUTME: Registrar trait, record snapshot, and registration errors.

mod cloudflare;

pub use cloudflare::CloudflareClient;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::{DeploymentName, DnsRecordId};

/// Points deployment hostnames at the host.
///
/// No existence check precedes creation: registering the same name twice
/// creates two records.
#[async_trait]
pub trait DnsRegistrar: Send + Sync {
    async fn register(&self, name: &DeploymentName) -> Result<DnsRecord, RegistrationError>;

    async fn deregister(&self, record: &DnsRecord) -> Result<(), RegistrationError>;
}

/// A created DNS record as the provider reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    pub id: DnsRecordId,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("DNS provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("DNS provider rejected the request: {message}")]
    Rejected { message: String, body: Value },

    #[error("malformed DNS provider response: {0}")]
    Malformed(String),

    #[error("request to DNS provider failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl RegistrationError {
    /// Provider response body, when it was JSON.
    pub fn raw(&self) -> Option<Value> {
        match self {
            RegistrationError::Status { body, .. } => serde_json::from_str(body).ok(),
            RegistrationError::Rejected { body, .. } => Some(body.clone()),
            _ => None,
        }
    }
}
