// ABOUTME: Test support utilities.
// ABOUTME: Tracing setup, shared fixtures, and fake pipeline components.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Once;

use dockhand::build::BuildArtifact;
use dockhand::config::CleanupPolicy;
use dockhand::deploy::{DeploymentRequest, PipelineSettings};
use dockhand::dns::DnsRecord;
use dockhand::types::{CommitSha, DeploymentName, DnsRecordId, ImageId};

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod fakes;

static TRACING_INIT: Once = Once::new();

pub const DOMAIN: &str = "apps.example.test";
pub const PUBLIC_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("dockhand=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn request() -> DeploymentRequest {
    DeploymentRequest::parse("acme", "widget", 8080, "DOCKER=1").unwrap()
}

#[allow(dead_code)]
pub fn name() -> DeploymentName {
    DeploymentName::with_suffix(request().repo(), 0x00c0ffee)
}

#[allow(dead_code)]
pub fn commit() -> CommitSha {
    CommitSha::parse(&"a".repeat(40)).unwrap()
}

#[allow(dead_code)]
pub fn artifact() -> BuildArtifact {
    BuildArtifact::new(ImageId::new("sha256:deadbeef"), "acme-widget:aaaaaaaaaaaa").unwrap()
}

#[allow(dead_code)]
pub fn dns_record(name: &DeploymentName) -> DnsRecord {
    DnsRecord {
        id: DnsRecordId::new("rec-1"),
        record_type: "A".to_string(),
        name: name.hostname(DOMAIN),
        content: PUBLIC_IP.to_string(),
        ttl: 1,
        proxied: true,
    }
}

#[allow(dead_code)]
pub fn settings(cleanup: CleanupPolicy) -> PipelineSettings {
    PipelineSettings {
        domain: DOMAIN.to_string(),
        public_ip: PUBLIC_IP,
        cleanup,
    }
}
