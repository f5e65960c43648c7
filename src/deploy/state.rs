// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: Each state carries exactly the outputs produced so far.

use crate::build::BuildArtifact;
use crate::dns::DnsRecord;
use crate::provision::ContainerInstance;
use crate::types::CommitSha;

/// Request accepted, nothing looked up yet.
/// Available actions: `resolve()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Accepted;

/// Newest commit known.
/// Available actions: `build()`
#[derive(Debug, Clone)]
pub struct Resolved {
    pub(crate) commit: CommitSha,
}

/// Image built and checked.
/// Available actions: `provision()`
#[derive(Debug, Clone)]
pub struct Built {
    pub(crate) commit: CommitSha,
    pub(crate) artifact: BuildArtifact,
}

/// Container running on a host port.
/// Available actions: `register()`
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub(crate) commit: CommitSha,
    pub(crate) artifact: BuildArtifact,
    pub(crate) container: ContainerInstance,
}

/// DNS record created.
/// Available actions: `configure()`
#[derive(Debug, Clone)]
pub struct Registered {
    pub(crate) commit: CommitSha,
    pub(crate) artifact: BuildArtifact,
    pub(crate) container: ContainerInstance,
    pub(crate) dns: DnsRecord,
}

/// Proxy serving the hostname.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Configured {
    pub(crate) commit: CommitSha,
    pub(crate) artifact: BuildArtifact,
    pub(crate) container: ContainerInstance,
    pub(crate) dns: DnsRecord,
}
