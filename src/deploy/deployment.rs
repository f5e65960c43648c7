// ABOUTME: Generic deployment struct parameterized by state.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::build::BuildArtifact;
use crate::dns::DnsRecord;
use crate::provision::ContainerInstance;
use crate::types::{CommitSha, DeploymentName, RepoRef};

use super::outcome::Resources;
use super::request::DeploymentRequest;
use super::state::{Accepted, Built, Configured, Provisioned, Registered, Resolved};

/// A deployment in progress, parameterized by its current state.
///
/// Outputs of finished steps live in the state type, so a step cannot run
/// before the data it needs exists.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: DeploymentRequest,
    pub(crate) name: DeploymentName,
    pub(crate) state: S,
}

impl Deployment<Accepted> {
    /// Start a deployment under a freshly generated name.
    pub fn new(request: DeploymentRequest) -> Self {
        let name = DeploymentName::generate(request.repo());
        Self::with_name(request, name)
    }

    pub fn with_name(request: DeploymentRequest, name: DeploymentName) -> Self {
        Deployment {
            request,
            name,
            state: Accepted,
        }
    }
}

impl<S> Deployment<S> {
    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }

    pub fn name(&self) -> &DeploymentName {
        &self.name
    }

    pub fn repo(&self) -> &RepoRef {
        self.request.repo()
    }
}

/// External resources a deployment has created so far.
pub trait Footprint {
    fn resources(&self) -> Resources;
}

impl Footprint for Deployment<Accepted> {
    fn resources(&self) -> Resources {
        Resources::default()
    }
}

impl Footprint for Deployment<Resolved> {
    fn resources(&self) -> Resources {
        Resources::default()
    }
}

impl Footprint for Deployment<Built> {
    fn resources(&self) -> Resources {
        Resources {
            image: Some(self.state.artifact.image_id().clone()),
            ..Resources::default()
        }
    }
}

impl Footprint for Deployment<Provisioned> {
    fn resources(&self) -> Resources {
        Resources {
            image: Some(self.state.artifact.image_id().clone()),
            container: Some(self.state.container.id.clone()),
            ..Resources::default()
        }
    }
}

impl Footprint for Deployment<Registered> {
    fn resources(&self) -> Resources {
        Resources {
            image: Some(self.state.artifact.image_id().clone()),
            container: Some(self.state.container.id.clone()),
            dns_record: Some(self.state.dns.clone()),
            proxy_files: None,
        }
    }
}

impl Deployment<Resolved> {
    pub fn commit(&self) -> &CommitSha {
        &self.state.commit
    }
}

impl Deployment<Built> {
    pub fn artifact(&self) -> &BuildArtifact {
        &self.state.artifact
    }
}

impl Deployment<Provisioned> {
    pub fn container(&self) -> &ContainerInstance {
        &self.state.container
    }
}

impl Deployment<Registered> {
    pub fn dns(&self) -> &DnsRecord {
        &self.state.dns
    }
}

impl Deployment<Configured> {
    pub fn container(&self) -> &ContainerInstance {
        &self.state.container
    }

    pub fn dns(&self) -> &DnsRecord {
        &self.state.dns
    }
}
