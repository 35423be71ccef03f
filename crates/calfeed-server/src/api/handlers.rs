//! API route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::service::FeedService;

use super::error::ApiError;

type Result<T> = std::result::Result<T, ApiError>;

/// Content type of feed documents.
pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Content disposition of feed documents.
pub const CALENDAR_DISPOSITION: &str = "inline; filename=\"calendar.ics\"";

/// State shared by all handlers.
pub struct AppState {
    pub service: FeedService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: FeedService) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}

/// GET|POST /feedURL
pub async fn create_feed(State(state): State<Arc<AppState>>) -> Result<String> {
    let token = state.service.create_feed().await?;
    Ok(format!("FeedToken: {}", token))
}

/// GET /feed/{token}
pub async fn read_feed(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    let document = state.service.read_feed(&token).await?;

    Ok((
        [
            (header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, CALENDAR_DISPOSITION),
        ],
        document.to_string(),
    ))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub feeds: CacheStats,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let feeds = state.service.cache().read().await.stats();
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime,
        feeds,
    })
}
