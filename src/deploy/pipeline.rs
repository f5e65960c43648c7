// ABOUTME: Orchestrator driving a deployment through every state.
// ABOUTME: Decides between Done, Aborted, and PartialFailure at each step boundary.

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span, warn};

use crate::diagnostics::Diagnostics;
use crate::types::DeploymentName;

use super::Deployment;
use super::compensate::settle;
use super::components::{Components, PipelineSettings};
use super::deployment::Footprint;
use super::error::DeployError;
use super::outcome::DeployOutcome;
use super::request::DeploymentRequest;
use super::state::Accepted;

/// Runs deployments with one set of components.
pub struct Pipeline {
    components: Components,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(components: Components, settings: PipelineSettings) -> Self {
        Self {
            components,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Deploy under a freshly generated name.
    pub async fn run(&self, request: DeploymentRequest, cancel: &CancellationToken) -> DeployOutcome {
        self.run_deployment(Deployment::new(request), cancel).await
    }

    pub async fn run_deployment(
        &self,
        deployment: Deployment<Accepted>,
        cancel: &CancellationToken,
    ) -> DeployOutcome {
        let span = info_span!(
            "deploy",
            name = %deployment.name(),
            repo = %deployment.repo(),
        );
        self.drive(deployment, cancel).instrument(span).await
    }

    async fn drive(
        &self,
        deployment: Deployment<Accepted>,
        cancel: &CancellationToken,
    ) -> DeployOutcome {
        let c = &self.components;
        info!(port = deployment.request().port(), "deployment accepted");

        let resolved = match deployment.resolve(c.resolver.as_ref()).await {
            Ok(d) => d,
            Err((d, e)) => return abort(d.name().clone(), e),
        };

        let built = match resolved.build(c.builder.as_ref(), cancel).await {
            Ok(d) => d,
            Err((d, e)) => return abort(d.name().clone(), e),
        };

        let provisioned = match built.provision(c.provisioner.as_ref()).await {
            Ok(d) => d,
            Err((d, e)) => return self.partial_failure(&d, e).await,
        };

        let registered = match provisioned.register(c.registrar.as_ref()).await {
            Ok(d) => d,
            Err((d, e)) => return self.partial_failure(&d, e).await,
        };

        let configured = match registered
            .configure(c.proxy.as_ref(), self.settings.public_ip)
            .await
        {
            Ok(d) => d,
            Err((d, e)) => return self.partial_failure(&d, e).await,
        };

        let result = configured.finish(&self.settings.domain);
        info!(url = %result.url, port = %result.port, "deployment done");
        DeployOutcome::Done(result)
    }

    async fn partial_failure<S>(&self, deployment: &Deployment<S>, error: DeployError) -> DeployOutcome
    where
        Deployment<S>: Footprint,
    {
        let name = deployment.name().clone();
        let mut resources = deployment.resources();
        resources.absorb(&name, &error);
        error!(phase = %error.phase(), error = %error, "deployment failed after creating resources");

        let mut diag = Diagnostics::default();
        let c = &self.components;
        let compensation = settle(
            &resources,
            self.settings.cleanup,
            c.provisioner.as_ref(),
            c.registrar.as_ref(),
            c.proxy.as_ref(),
            &mut diag,
        )
        .await;

        DeployOutcome::PartialFailure {
            name,
            error,
            resources,
            compensation,
            warnings: diag.into_warnings(),
        }
    }
}

fn abort(name: DeploymentName, error: DeployError) -> DeployOutcome {
    warn!(phase = %error.phase(), error = %error, "deployment aborted");
    DeployOutcome::Aborted { name, error }
}
