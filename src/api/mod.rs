//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response
//! structures. The router is the rendering surface's door: it relays
//! user interactions into the countdown and serves the face model.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/tap", post(tap_handler))
        .route("/duration", post(duration_handler))
        .route("/face", get(face_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        // A browser widget polls from another origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_wires_every_endpoint() {
        // Route registration panics on malformed paths; constructing
        // the router is the smoke test.
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), 25));
        let _router = create_router(state);
    }
}
