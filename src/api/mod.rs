//! HTTP API
//!
//! `GET /health` and `POST /query` over a shared agent and session store.

pub mod routes;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::agent::Agent;
use crate::core::{AnalystError, Config, Result};
use crate::session::SessionStore;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(agent: Arc<Agent>) -> Self {
        Self {
            agent,
            sessions: SessionStore::new(),
        }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/query", post(routes::query_agent))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(config: &Config, agent: Arc<Agent>) -> Result<()> {
    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AnalystError::config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!(addr = %addr, model = agent.model(), "Listening on http://{}", addr);

    let app = build_router(AppState::new(agent));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
