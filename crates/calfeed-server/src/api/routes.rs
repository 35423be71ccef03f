//! API route configuration.

use std::sync::Arc;

use axum::{Router, routing::get};

use super::handlers::{self, AppState};

/// Path segment preceding the token on feed URLs.
pub const FEED_PREFIX: &str = "/feed/";

/// Creates the router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/feedURL",
            get(handlers::create_feed).post(handlers::create_feed),
        )
        .route("/feed/:token", get(handlers::read_feed))
        .with_state(state)
}
