//! plp-web library interface
//!
//! Exposes the application state and router for integration testing.

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use plp_engine::PlaylistOrchestrator;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Message-to-playlist orchestrator (owns resolver and cache)
    pub orchestrator: Arc<PlaylistOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: PlaylistOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::playlist_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
