// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! HTTP surface.
//!
//! | Route                           | Response                               |
//! |---------------------------------|----------------------------------------|
//! | `GET /health`                   | `{"status":"ok"}`                      |
//! | `GET /news/:ticker`             | `{"ticker", "news": [...]}`            |
//! | `GET /news/:ticker?q=apple`     | same, filtered on title/summary        |
//! | `GET /news/:ticker?summarize=true` | `{"ticker", "summary"}`             |
//!
//! Errors are `{"error": "<message>"}`.

mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use handlers::is_valid_ticker;
pub use state::AppState;

use axum::{middleware, routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/news/:ticker", get(handlers::get_news))
        .layer(middleware::from_fn(handlers::log_requests))
        .with_state(state)
}

/// Bind `0.0.0.0:port` and serve until `shutdown` resolves.
pub async fn serve(
    state: Arc<AppState>,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped accepting requests");
    Ok(())
}
