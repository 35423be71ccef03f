//! HTTP surface of the feed service.
//!
//! ## Endpoints
//!
//! - `GET|POST /feedURL` - mint a token and populate its feed
//! - `GET /feed/:token` - the token's calendar document
//! - `GET /health` - liveness and cache counters

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use handlers::{AppState, CALENDAR_CONTENT_TYPE, CALENDAR_DISPOSITION, HealthResponse};
pub use routes::{FEED_PREFIX, create_router};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::service::FeedService;
use crate::signals::ShutdownSignal;

/// HTTP server wrapping a [`FeedService`].
pub struct FeedServer {
    state: Arc<AppState>,
}

impl FeedServer {
    /// Creates a new server for `service`.
    pub fn new(service: FeedService) -> Self {
        Self {
            state: Arc::new(AppState::new(service)),
        }
    }

    /// Creates the router with all routes and layers configured.
    pub fn router(&self) -> Router {
        create_router(self.state.clone()).layer(TraceLayer::new_for_http())
    }

    /// Binds `addr` and serves until `shutdown` fires.
    pub async fn run(self, addr: SocketAddr, shutdown: ShutdownSignal) -> ServerResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` fires.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr = listener.local_addr()?;
        info!(%addr, "Feed server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        info!("Feed server stopped");
        Ok(())
    }
}
