//! HTTP REST adapter
//!
//! Depends only on core/. Provides the upload endpoint and health
//! check via the Axum web framework.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::core::services::Services;

pub mod handlers;
pub mod middleware;

pub use handlers::*;

/// Build the application router
///
/// Shared between `main` and the integration tests so both exercise
/// the same middleware stack.
pub fn router(services: Arc<Services>) -> Router {
    let max_body = services.config.limits.max_body_mb * 1024 * 1024;

    Router::new()
        // Health check endpoint
        .route("/health", get(handlers::health_handler))
        // Upload-and-process endpoint
        .route("/uploadmultiple", post(handlers::upload_multiple_handler))
        // Add middleware
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(max_body))
        // Add shared state
        .with_state(services)
}
