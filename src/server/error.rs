// ABOUTME: HTTP error responses.
// ABOUTME: Maps request, wiring, and deployment failures to status codes and JSON bodies.

use std::fmt::Display;

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::deploy::{CompensationRecord, DeployError, Phase, Resources};
use crate::diagnostics::Warning;
use crate::types::DeploymentName;

pub const PHASE_HEADER: &str = "x-deploy-phase";
pub const NAME_HEADER: &str = "x-deploy-name";

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    body: Value,
    phase: Option<Phase>,
    name: Option<String>,
}

impl AppError {
    fn plain(status: StatusCode, message: impl Display) -> Self {
        Self {
            status,
            body: json!({ "error": message.to_string() }),
            phase: None,
            name: None,
        }
    }

    /// 400 Bad Request.
    pub fn bad_request(message: impl Display) -> Self {
        Self::plain(StatusCode::BAD_REQUEST, message)
    }

    /// 503: the deployment machinery could not be set up.
    pub fn unavailable(message: impl Display) -> Self {
        Self::plain(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal(message: impl Display) -> Self {
        Self::plain(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Failure before anything external existed.
    pub fn aborted(name: &DeploymentName, error: &DeployError) -> Self {
        let mut body = json!({
            "error": error.to_string(),
            "phase": error.phase(),
            "kind": error.kind(),
            "name": name,
        });
        if let Some(tail) = error.log_tail() {
            body["log_tail"] = Value::String(tail.to_string());
        }
        Self {
            status: StatusCode::BAD_GATEWAY,
            body,
            phase: Some(error.phase()),
            name: Some(name.to_string()),
        }
    }

    /// Failure after resources were created. The upstream payload is returned
    /// verbatim when there is one; otherwise a structured report.
    pub fn partial_failure(
        name: &DeploymentName,
        error: &DeployError,
        resources: &Resources,
        compensation: &[CompensationRecord],
        warnings: &[Warning],
    ) -> Self {
        let body = error.raw().unwrap_or_else(|| {
            json!({
                "error": error.to_string(),
                "phase": error.phase(),
                "kind": error.kind(),
                "name": name,
                "resources": resources,
                "compensation": compensation,
                "warnings": warnings,
            })
        });
        Self {
            status: StatusCode::BAD_GATEWAY,
            body,
            phase: Some(error.phase()),
            name: Some(name.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = (self.status, axum::Json(self.body)).into_response();
        let headers = response.headers_mut();
        if let Some(phase) = self.phase
            && let Ok(value) = HeaderValue::from_str(&phase.to_string())
        {
            headers.insert(PHASE_HEADER, value);
        }
        if let Some(name) = self.name
            && let Ok(value) = HeaderValue::from_str(&name)
        {
            headers.insert(NAME_HEADER, value);
        }
        response
    }
}
