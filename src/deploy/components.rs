// ABOUTME: Wiring of pipeline components and per-deployment settings.
// ABOUTME: Live components get fresh clients for every deployment.

use std::net::IpAddr;
use std::sync::Arc;

use crate::build::{EngineBuilder, ImageBuilder};
use crate::config::{CleanupPolicy, Config};
use crate::dns::{CloudflareClient, DnsRegistrar};
use crate::error::Result;
use crate::provision::{ContainerProvisioner, EngineProvisioner};
use crate::proxy::{NginxConfigurator, ProxyConfigurator, Template};
use crate::runtime::{BollardRuntime, ImageOps, OsPortAllocator};
use crate::source::{CommitResolver, GithubClient};

/// The five collaborators one deployment talks to.
pub struct Components {
    pub resolver: Box<dyn CommitResolver>,
    pub builder: Box<dyn ImageBuilder>,
    pub provisioner: Box<dyn ContainerProvisioner>,
    pub registrar: Box<dyn DnsRegistrar>,
    pub proxy: Box<dyn ProxyConfigurator>,
}

/// Settings that shape a run but are not components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub domain: String,
    pub public_ip: IpAddr,
    pub cleanup: CleanupPolicy,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            domain: config.domain.trim_matches('.').to_string(),
            public_ip: config.public_ip()?,
            cleanup: config.cleanup,
        })
    }
}

/// Creates components scoped to a single deployment.
pub trait ComponentFactory: Send + Sync {
    fn components(&self) -> Result<Components>;

    fn settings(&self) -> Result<PipelineSettings>;

    /// Engine handle for image pulls.
    fn image_ops(&self) -> Result<Box<dyn ImageOps>>;
}

/// Factory backed by the real engine, GitHub, Cloudflare, and nginx.
pub struct LiveComponents {
    config: Arc<Config>,
    ports: Arc<OsPortAllocator>,
    template: Template,
}

impl LiveComponents {
    /// Reads the vhost template up front so deployments never touch the
    /// template file.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let template = NginxConfigurator::load_template(&config.proxy)?;
        Ok(Self {
            config,
            ports: Arc::new(OsPortAllocator::new()),
            template,
        })
    }
}

impl ComponentFactory for LiveComponents {
    fn components(&self) -> Result<Components> {
        let config = &self.config;
        let settings = self.settings()?;

        // The engine client's own timeout would otherwise cut long builds short.
        let mut build_engine = config.engine.clone();
        build_engine.timeout = build_engine.timeout.max(config.build.timeout);

        Ok(Components {
            resolver: Box::new(GithubClient::new(&config.source, config.http_timeout)?),
            builder: Box::new(EngineBuilder::new(
                BollardRuntime::connect(&build_engine)?,
                &config.source,
                &config.build,
            )),
            provisioner: Box::new(EngineProvisioner::new(
                BollardRuntime::connect(&config.engine)?,
                Arc::clone(&self.ports),
            )),
            registrar: Box::new(CloudflareClient::new(
                &config.dns,
                settings.public_ip,
                config.http_timeout,
            )?),
            proxy: Box::new(NginxConfigurator::with_template(
                &config.proxy,
                &settings.domain,
                self.template.clone(),
            )),
        })
    }

    fn settings(&self) -> Result<PipelineSettings> {
        PipelineSettings::from_config(&self.config)
    }

    fn image_ops(&self) -> Result<Box<dyn ImageOps>> {
        Ok(Box::new(BollardRuntime::connect(&self.config.engine)?))
    }
}
