//! Feed service: token minting, TTL cache, HTTP endpoints.
//!
//! This crate provides the calfeed server that:
//! - Mints unguessable feed tokens
//! - Caches one iCalendar document per token with a TTL
//! - Regenerates stale documents lazily, on the next read
//! - Serves everything over HTTP
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use calfeed_providers::{HttpEntrySource, HttpSourceConfig};
//! use calfeed_server::{FeedServer, FeedService, SignalHandler, TokenMinter, new_shared_cache};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpEntrySource::new(HttpSourceConfig::new("http://localhost:3000/entries")?)?;
//!     let service = FeedService::new(
//!         Arc::new(source),
//!         new_shared_cache(std::time::Duration::from_secs(300)),
//!         TokenMinter::default(),
//!     );
//!
//!     let signals = SignalHandler::new();
//!     signals.spawn_listener();
//!     FeedServer::new(service)
//!         .run("127.0.0.1:8080".parse()?, signals.shutdown())
//!         .await?;
//!     Ok(())
//! }
//! ```

mod api;
mod cache;
mod cli;
mod config;
mod error;
mod service;
mod signals;
mod token;

pub use api::{
    ApiError, AppState, CALENDAR_CONTENT_TYPE, CALENDAR_DISPOSITION, FEED_PREFIX, FeedServer,
    HealthResponse, create_router,
};
pub use cache::{
    CacheStats, DEFAULT_TTL, FeedCache, FeedEntry, SharedFeedCache, new_shared_cache,
};
pub use cli::Cli;
pub use config::{
    CacheSettings, DEFAULT_LISTEN, DEFAULT_UPSTREAM_URL, FeedConfig, LoggingSettings,
    ServerSettings, TokenSettings, UpstreamSettings,
};
pub use error::{FeedError, FeedResult, ServerError, ServerResult};
pub use service::FeedService;
pub use signals::{ShutdownSignal, SignalHandler};
pub use token::{DEFAULT_TOKEN_BYTES, TokenMinter, mint, redact};
