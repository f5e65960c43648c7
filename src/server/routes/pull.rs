// ABOUTME: Image pull endpoint.
// ABOUTME: Relays engine pull progress to the client as server-sent events.

use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::server::error::AppError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PullQuery {
    pub image: String,
}

/// GET /api/docker/pull?image=: SSE stream of pull progress.
///
/// Emits `progress` events, then one `complete` or `error` event.
pub async fn pull(
    State(app): State<AppState>,
    Query(query): Query<PullQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let image = query.image.trim().to_string();
    if image.is_empty() {
        return Err(AppError::bad_request("image cannot be empty"));
    }
    let engine = app.factory.image_ops().map_err(AppError::unavailable)?;

    let (tx, rx) = mpsc::channel::<Event>(32);
    tokio::spawn(async move {
        let mut stream = engine.pull_image(&image);
        while let Some(item) = stream.next().await {
            let event = match item {
                Ok(progress) => Event::default()
                    .event("progress")
                    .json_data(&progress)
                    .unwrap_or_else(|e| Event::default().event("error").data(e.to_string())),
                Err(e) => {
                    tracing::warn!(%image, error = %e, "image pull failed");
                    let _ = tx.send(Event::default().event("error").data(e.to_string())).await;
                    return;
                }
            };
            if tx.send(event).await.is_err() {
                tracing::debug!(%image, "pull client disconnected");
                return;
            }
        }
        tracing::info!(%image, "image pulled");
        let _ = tx.send(Event::default().event("complete").data(image)).await;
    });

    let stream = ReceiverStream::new(rx).map(Ok::<Event, Infallible>);
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
