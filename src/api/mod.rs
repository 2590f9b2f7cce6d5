//! HTTP API for batch email discovery
//!
//! Routes:
//! - `POST /scrape-emails` - run one batch, respond with a [`BatchResult`](crate::batch::BatchResult)
//! - `GET /health` - static liveness probe
//!
//! Request bodies are validated completely before any crawl starts; a bad
//! payload gets a 400 and no partial results.

mod handlers;
mod request;

pub use handlers::{health, scrape_emails};
pub use request::{parse_request, BatchInputError};

use crate::batch::{BatchOptions, BatchRunner};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub runner: BatchRunner,
    /// Options used when a request does not override them
    pub defaults: BatchOptions,
}

impl AppState {
    pub fn new(runner: BatchRunner, defaults: BatchOptions) -> Self {
        Self { runner, defaults }
    }
}

/// Builds the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/scrape-emails", post(scrape_emails))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on an already-bound listener until the process exits
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state)).await
}
