// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state, or self plus the error.

use std::net::IpAddr;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::build::ImageBuilder;
use crate::dns::DnsRegistrar;
use crate::provision::ContainerProvisioner;
use crate::proxy::ProxyConfigurator;
use crate::source::CommitResolver;

use super::Deployment;
use super::error::DeployError;
use super::outcome::DeploymentResult;
use super::state::{Accepted, Built, Configured, Provisioned, Registered, Resolved};

/// Result type for transitions. On failure the deployment comes back in its
/// previous state so the caller still knows what exists.
pub type TransitionResult<T, S> = Result<Deployment<T>, (Deployment<S>, DeployError)>;

impl<S> Deployment<S> {
    fn advance<T>(self, next: impl FnOnce(S) -> T) -> Deployment<T> {
        Deployment {
            request: self.request,
            name: self.name,
            state: next(self.state),
        }
    }
}

// =============================================================================
// Accepted -> Resolved
// =============================================================================

impl Deployment<Accepted> {
    /// Look up the newest commit of the repository.
    pub async fn resolve<R>(self, resolver: &R) -> TransitionResult<Resolved, Accepted>
    where
        R: CommitResolver + ?Sized,
    {
        match resolver.resolve(self.repo()).await {
            Ok(commit) => {
                info!(commit = %commit, "commit resolved");
                Ok(self.advance(|_| Resolved { commit }))
            }
            Err(e) => Err((self, e.into())),
        }
    }
}

// =============================================================================
// Resolved -> Built
// =============================================================================

impl Deployment<Resolved> {
    /// Build the image. The artifact is checked explicitly: finishing the
    /// build call is not proof of a usable image.
    pub async fn build<B>(
        self,
        builder: &B,
        cancel: &CancellationToken,
    ) -> TransitionResult<Built, Resolved>
    where
        B: ImageBuilder + ?Sized,
    {
        let artifact = match builder
            .build(self.repo(), &self.state.commit, cancel)
            .await
            .and_then(|artifact| artifact.ensure_usable().map(|()| artifact))
        {
            Ok(artifact) => artifact,
            Err(e) => return Err((self, e.into())),
        };

        info!(image = %artifact.image_id().short(), tag = artifact.tag(), "image ready");
        Ok(self.advance(|s| Built {
            commit: s.commit,
            artifact,
        }))
    }
}

// =============================================================================
// Built -> Provisioned
// =============================================================================

impl Deployment<Built> {
    pub async fn provision<P>(self, provisioner: &P) -> TransitionResult<Provisioned, Built>
    where
        P: ContainerProvisioner + ?Sized,
    {
        let result = provisioner
            .provision(
                &self.state.artifact,
                &self.name,
                self.request.port(),
                self.request.env(),
            )
            .await;

        match result {
            Ok(container) => {
                info!(
                    container = %container.id.short(),
                    host_port = container.host_port,
                    "container provisioned"
                );
                Ok(self.advance(|s| Provisioned {
                    commit: s.commit,
                    artifact: s.artifact,
                    container,
                }))
            }
            Err(e) => Err((self, e.into())),
        }
    }
}

// =============================================================================
// Provisioned -> Registered
// =============================================================================

impl Deployment<Provisioned> {
    pub async fn register<D>(self, registrar: &D) -> TransitionResult<Registered, Provisioned>
    where
        D: DnsRegistrar + ?Sized,
    {
        match registrar.register(&self.name).await {
            Ok(dns) => {
                info!(record = %dns.id, hostname = %dns.name, "DNS record registered");
                Ok(self.advance(|s| Registered {
                    commit: s.commit,
                    artifact: s.artifact,
                    container: s.container,
                    dns,
                }))
            }
            Err(e) => Err((self, e.into())),
        }
    }
}

// =============================================================================
// Registered -> Configured
// =============================================================================

impl Deployment<Registered> {
    pub async fn configure<C>(
        self,
        proxy: &C,
        public_ip: IpAddr,
    ) -> TransitionResult<Configured, Registered>
    where
        C: ProxyConfigurator + ?Sized,
    {
        let result = proxy
            .configure(
                &self.name,
                self.request.port(),
                self.state.container.host_port,
                public_ip,
            )
            .await;

        match result {
            Ok(()) => {
                info!("proxy configured");
                Ok(self.advance(|s| Configured {
                    commit: s.commit,
                    artifact: s.artifact,
                    container: s.container,
                    dns: s.dns,
                }))
            }
            Err(e) => Err((self, e.into())),
        }
    }
}

// =============================================================================
// Configured -> result
// =============================================================================

impl Deployment<Configured> {
    /// Assemble the public result. Only a fully configured deployment has one:
    ///
    /// ```compile_fail
    /// use dockhand::deploy::{Deployment, DeploymentRequest};
    ///
    /// let request = DeploymentRequest::parse("acme", "widget", 8080, "").unwrap();
    /// let _ = Deployment::new(request).finish("example.com");
    /// ```
    pub fn finish(self, domain: &str) -> DeploymentResult {
        let Configured {
            commit,
            artifact,
            container,
            dns,
        } = self.state;

        DeploymentResult {
            url: self.name.hostname(domain),
            port: container.host_port.to_string(),
            image: artifact.image_id().clone(),
            container,
            dns,
            name: self.name,
            commit,
        }
    }
}
