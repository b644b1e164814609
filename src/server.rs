//! Webhook endpoint for the Bot API.
//!
//! Every POST to the webhook path is acknowledged with `200 OK`, whatever
//! happens while handling it. Malformed bodies are logged and dropped.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::bot::UpdateRouter;
use crate::platform::telegram::parse_update;

#[derive(Clone)]
struct ServerState {
    router: Arc<UpdateRouter>,
}

async fn receive_update(State(state): State<ServerState>, body: Bytes) -> StatusCode {
    match parse_update(&body) {
        Ok(update) => state.router.dispatch(update).await,
        Err(e) => warn!("Ignoring malformed update: {:#}", e),
    }
    StatusCode::OK
}

async fn health() -> &'static str {
    "ok"
}

pub fn app(router: Arc<UpdateRouter>, webhook_path: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(webhook_path, post(receive_update))
        .with_state(ServerState { router })
}

/// Serve the webhook until Ctrl-C.
pub async fn run(addr: SocketAddr, webhook_path: &str, router: Arc<UpdateRouter>) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Webhook listening on http://{}{}", addr, webhook_path);

    axum::serve(listener, app(router, webhook_path))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down webhook server");
        })
        .await
        .context("Server error")?;

    Ok(())
}
