// ABOUTME: Liveness endpoint.
// ABOUTME: Answers with a fixed acknowledgement body.

use axum::Json;
use serde_json::{Value, json};

/// GET /: liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "message": "Accepted", "status": "success" }))
}
