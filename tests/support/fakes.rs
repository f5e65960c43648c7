// ABOUTME: Mocks and scripted fakes for pipeline components and the engine.
// ABOUTME: mockall for the async component traits, hand-written streams for ImageOps.

use std::net::IpAddr;

use async_trait::async_trait;
use futures::stream;
use mockall::mock;
use parking_lot::Mutex;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use dockhand::build::{BuildArtifact, BuildError, ImageBuilder};
use dockhand::deploy::{ComponentFactory, Components, PipelineSettings};
use dockhand::dns::{DnsRecord, DnsRegistrar, RegistrationError};
use dockhand::error::{Error, Result};
use dockhand::provision::{ContainerInstance, ContainerProvisioner, ProvisionError};
use dockhand::proxy::{ConfigurationError, ProxyConfigurator};
use dockhand::runtime::{
    BuildRequest, BuildStream, ContainerError, ContainerInfo, ContainerOps, ContainerSpec,
    ImageError, ImageOps, PortAllocator, PullProgress, PullStream,
};
use dockhand::source::{CommitResolver, ResolveError};
use dockhand::types::{CommitSha, ContainerId, DeploymentName, EnvAssignment, RepoRef};

mock! {
    pub Resolver {}

    #[async_trait]
    impl CommitResolver for Resolver {
        async fn resolve(&self, repo: &RepoRef) -> std::result::Result<CommitSha, ResolveError>;
    }
}

mock! {
    pub Builder {}

    #[async_trait]
    impl ImageBuilder for Builder {
        async fn build(
            &self,
            repo: &RepoRef,
            commit: &CommitSha,
            cancel: &CancellationToken,
        ) -> std::result::Result<BuildArtifact, BuildError>;
    }
}

mock! {
    pub Provisioner {}

    #[async_trait]
    impl ContainerProvisioner for Provisioner {
        async fn provision(
            &self,
            artifact: &BuildArtifact,
            name: &DeploymentName,
            exposed_port: u16,
            env: &[EnvAssignment],
        ) -> std::result::Result<ContainerInstance, ProvisionError>;

        async fn remove(&self, id: &ContainerId) -> std::result::Result<(), ProvisionError>;
    }
}

mock! {
    pub Registrar {}

    #[async_trait]
    impl DnsRegistrar for Registrar {
        async fn register(
            &self,
            name: &DeploymentName,
        ) -> std::result::Result<DnsRecord, RegistrationError>;

        async fn deregister(&self, record: &DnsRecord) -> std::result::Result<(), RegistrationError>;
    }
}

mock! {
    pub Proxy {}

    #[async_trait]
    impl ProxyConfigurator for Proxy {
        async fn configure(
            &self,
            name: &DeploymentName,
            port: u16,
            host_port: u16,
            public_ip: IpAddr,
        ) -> std::result::Result<(), ConfigurationError>;

        async fn remove(&self, name: &DeploymentName) -> std::result::Result<(), ConfigurationError>;
    }
}

mock! {
    pub Engine {}

    #[async_trait]
    impl ContainerOps for Engine {
        async fn create_container(&self, spec: &ContainerSpec) -> std::result::Result<Value, ContainerError>;
        async fn start_container(&self, id: &ContainerId) -> std::result::Result<(), ContainerError>;
        async fn inspect_container(&self, id: &ContainerId) -> std::result::Result<ContainerInfo, ContainerError>;
        async fn remove_container(&self, id: &ContainerId, force: bool) -> std::result::Result<(), ContainerError>;
    }
}

mock! {
    pub Ports {}

    impl PortAllocator for Ports {
        fn allocate(&self) -> std::io::Result<u16>;
    }
}

/// Image engine that replays canned output.
#[derive(Default)]
pub struct ScriptedImages {
    pub build_output: Vec<std::result::Result<String, ImageError>>,
    pub pull_output: Vec<std::result::Result<PullProgress, ImageError>>,
    /// Never finish the build stream after the canned output.
    pub stall: bool,
    pub requests: Mutex<Vec<BuildRequest>>,
}

impl ScriptedImages {
    pub fn building(lines: &[&str]) -> Self {
        Self {
            build_output: lines.iter().map(|l| Ok(format!("{l}\n"))).collect(),
            ..Default::default()
        }
    }

    pub fn pulling(events: Vec<std::result::Result<PullProgress, ImageError>>) -> Self {
        Self {
            pull_output: events,
            ..Default::default()
        }
    }

    pub fn stalled(mut self) -> Self {
        self.stall = true;
        self
    }

    pub fn last_request(&self) -> Option<BuildRequest> {
        self.requests.lock().last().cloned()
    }
}

impl ImageOps for ScriptedImages {
    fn build_image(&self, request: &BuildRequest) -> BuildStream<'_> {
        self.requests.lock().push(request.clone());
        let canned = stream::iter(self.build_output.clone());
        if self.stall {
            Box::pin(futures::StreamExt::chain(canned, stream::pending()))
        } else {
            Box::pin(canned)
        }
    }

    fn pull_image(&self, _reference: &str) -> PullStream<'_> {
        Box::pin(stream::iter(self.pull_output.clone()))
    }
}

/// Hands out one prepared set of components per call.
pub struct FakeFactory {
    components: Mutex<Vec<Components>>,
    settings: PipelineSettings,
    pulls: Option<Vec<std::result::Result<PullProgress, ImageError>>>,
}

impl FakeFactory {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            components: Mutex::new(Vec::new()),
            settings,
            pulls: None,
        }
    }

    pub fn with_components(self, components: Components) -> Self {
        self.components.lock().push(components);
        self
    }

    pub fn with_pulls(mut self, events: Vec<std::result::Result<PullProgress, ImageError>>) -> Self {
        self.pulls = Some(events);
        self
    }
}

impl ComponentFactory for FakeFactory {
    fn components(&self) -> Result<Components> {
        self.components
            .lock()
            .pop()
            .ok_or_else(|| Error::InvalidConfig("no components prepared".to_string()))
    }

    fn settings(&self) -> Result<PipelineSettings> {
        Ok(self.settings.clone())
    }

    fn image_ops(&self) -> Result<Box<dyn ImageOps>> {
        let events = self
            .pulls
            .clone()
            .ok_or_else(|| Error::InvalidConfig("no image engine prepared".to_string()))?;
        Ok(Box::new(ScriptedImages::pulling(events)))
    }
}

/// Components whose every call panics unless a test sets an expectation.
pub struct MockSet {
    pub resolver: MockResolver,
    pub builder: MockBuilder,
    pub provisioner: MockProvisioner,
    pub registrar: MockRegistrar,
    pub proxy: MockProxy,
}

impl MockSet {
    pub fn new() -> Self {
        Self {
            resolver: MockResolver::new(),
            builder: MockBuilder::new(),
            provisioner: MockProvisioner::new(),
            registrar: MockRegistrar::new(),
            proxy: MockProxy::new(),
        }
    }

    pub fn into_components(self) -> Components {
        Components {
            resolver: Box::new(self.resolver),
            builder: Box::new(self.builder),
            provisioner: Box::new(self.provisioner),
            registrar: Box::new(self.registrar),
            proxy: Box::new(self.proxy),
        }
    }
}
