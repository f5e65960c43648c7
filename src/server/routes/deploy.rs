// ABOUTME: Deploy endpoint for GitHub repositories.
// ABOUTME: Runs the pipeline in its own task and maps the outcome to a response.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::deploy::{
    DEFAULT_ENV, DEFAULT_PORT, DeployOutcome, DeploymentRequest, DeploymentResult, Pipeline,
};
use crate::server::error::AppError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeployQuery {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_env_vars")]
    pub env_vars: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_env_vars() -> String {
    DEFAULT_ENV.to_string()
}

/// POST /api/github/deploy/{owner}/{repo}?port=&env_vars=
///
/// The deployment runs in its own task. If the client goes away the build is
/// cancelled; later steps run to completion so nothing is left half-created.
pub async fn deploy(
    State(app): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<DeployQuery>,
) -> Result<Json<DeploymentResult>, AppError> {
    let request = DeploymentRequest::parse(&owner, &repo, query.port, &query.env_vars)
        .map_err(AppError::bad_request)?;

    let components = app.factory.components().map_err(AppError::unavailable)?;
    let settings = app.factory.settings().map_err(AppError::unavailable)?;
    let pipeline = Pipeline::new(components, settings);

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let task = tokio::spawn(async move { pipeline.run(request, &cancel).await });
    let outcome = task.await.map_err(AppError::internal)?;
    guard.disarm();

    match outcome {
        DeployOutcome::Done(result) => Ok(Json(result)),
        DeployOutcome::Aborted { name, error } => Err(AppError::aborted(&name, &error)),
        DeployOutcome::PartialFailure {
            name,
            error,
            resources,
            compensation,
            warnings,
        } => Err(AppError::partial_failure(
            &name,
            &error,
            &resources,
            &compensation,
            &warnings,
        )),
    }
}
