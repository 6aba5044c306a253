//! HTTP router setup.

use crate::handlers;
use crate::middleware::inject_request_id;
use crate::state::AppState;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::page))
        .route("/api/{token_id}", get(handlers::metadata))
        .route("/state", get(handlers::state))
        .route("/connect", post(handlers::connect))
        .route("/start-presale", post(handlers::start_presale))
        .route("/presale-mint", post(handlers::presale_mint))
        .route("/mint", post(handlers::public_mint))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(from_fn(inject_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
