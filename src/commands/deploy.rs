// ABOUTME: Deploy command implementation.
// ABOUTME: Runs one deployment in-process and reports the outcome.

use std::sync::Arc;

use dockhand::config::Config;
use dockhand::deploy::{ComponentFactory, DeployOutcome, DeploymentRequest, LiveComponents, Pipeline};
use dockhand::error::{Error, Result};
use dockhand::output::Output;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

pub async fn deploy(config: Config, request: DeploymentRequest, mut output: Output) -> Result<()> {
    config.check()?;
    output.start_timer();

    let factory = LiveComponents::new(Arc::new(config))?;
    let pipeline = Pipeline::new(factory.components()?, factory.settings()?);

    output.progress(&format!(
        "Deploying {} (container port {})",
        request.repo(),
        request.port()
    ));

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let outcome = pipeline.run(request, &cancel).await;
    ctrl_c.abort();

    report(&output, outcome)
}

fn report(output: &Output, outcome: DeployOutcome) -> Result<()> {
    match outcome {
        DeployOutcome::Done(result) => {
            let detail = serde_json::to_value(&result).ok();
            output.success(
                &format!("Deployed {} on host port {}", result.url, result.port),
                detail.as_ref(),
            );
            Ok(())
        }
        DeployOutcome::Aborted { name, error } => {
            let detail = error.log_tail().map(|t| Value::String(t.to_string()));
            let message = format!("{} aborted while {}: {}", name, error.phase(), error);
            output.error(&message, detail.as_ref());
            Err(Error::DeploymentFailed(message))
        }
        DeployOutcome::PartialFailure {
            name,
            error,
            compensation,
            warnings,
            ..
        } => {
            for warning in &warnings {
                output.warning(&warning.message);
            }
            for step in compensation.iter().filter(|s| s.succeeded) {
                output.progress(&format!("Cleaned up {:?} {}", step.action, step.target));
            }
            let message = format!("{} failed while {}: {}", name, error.phase(), error);
            output.error(&message, error.raw().as_ref());
            Err(Error::DeploymentFailed(message))
        }
    }
}
