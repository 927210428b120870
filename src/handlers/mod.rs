//! HTTP request handlers for the chatrelay API

use crate::config::Config;
use crate::middleware::request_id_middleware;
use crate::upstream::CompletionClient;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod chat;
pub mod health;
pub mod upload;

/// Application state shared across all handlers
///
/// Holds the configuration and the single upstream client constructed at
/// startup. Both are Arc'd for cheap cloning across Axum handlers; the
/// client is read-only and safe to share.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    upstream: Arc<CompletionClient>,
}

impl AppState {
    /// Create a new AppState from configuration and an injected client
    pub fn new(config: Arc<Config>, upstream: CompletionClient) -> Self {
        Self {
            config,
            upstream: Arc::new(upstream),
        }
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the upstream completion client
    pub fn upstream(&self) -> &CompletionClient {
        &self.upstream
    }
}

/// Build the application router with all routes and layers
///
/// Cross-origin requests are permitted from any origin on every route.
/// The upload route disables the default body limit: the whole file is
/// buffered in memory regardless of size.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat::handler))
        .route(
            "/upload",
            post(upload::handler).layer(DefaultBodyLimit::disable()),
        )
        .route("/health", get(health::handler))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}
