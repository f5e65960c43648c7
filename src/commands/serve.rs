// ABOUTME: Serve command implementation.
// ABOUTME: Checks configuration, probes the engine, and runs the HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use dockhand::config::Config;
use dockhand::deploy::LiveComponents;
use dockhand::error::Result;
use dockhand::runtime::BollardRuntime;
use dockhand::server::{self, AppState};

pub async fn serve(config: Config, bind: Option<SocketAddr>) -> Result<()> {
    config.check()?;
    let addr = bind.unwrap_or(config.server.bind);

    // An unreachable engine is not fatal: it may come up later.
    let engine = BollardRuntime::connect(&config.engine)?;
    if let Err(e) = engine.ping().await {
        tracing::warn!(error = %e, "container engine not reachable yet");
    }

    let state = AppState::new(Arc::new(LiveComponents::new(Arc::new(config))?));
    server::serve(state, addr).await?;
    Ok(())
}
