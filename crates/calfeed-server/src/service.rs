//! Feed service: token creation and lazy regeneration.
//!
//! ```text
//! create:  mint ─▶ fetch ─▶ encode ─▶ store ─▶ token
//! read:    lookup ─┬─ absent ─▶ TokenNotFound
//!                  ├─ fresh  ─▶ document
//!                  └─ stale  ─▶ fetch ─▶ encode ─▶ store ─▶ document
//! ```
//!
//! Concurrent stale reads of one token are not coalesced; each refreshes and
//! the last store wins.

use std::sync::Arc;

use tracing::{debug, info, warn};

use calfeed_core::encode_calendar;
use calfeed_providers::EntrySource;

use crate::cache::SharedFeedCache;
use crate::error::{FeedError, FeedResult};
use crate::token::{TokenMinter, redact};

/// Orchestrates the token minter, entry source, encoder and cache.
#[derive(Clone)]
pub struct FeedService {
    source: Arc<dyn EntrySource>,
    cache: SharedFeedCache,
    minter: TokenMinter,
}

impl FeedService {
    /// Creates a new service.
    pub fn new(source: Arc<dyn EntrySource>, cache: SharedFeedCache, minter: TokenMinter) -> Self {
        Self {
            source,
            cache,
            minter,
        }
    }

    /// Returns the shared cache handle.
    pub fn cache(&self) -> &SharedFeedCache {
        &self.cache
    }

    /// Returns the token minter.
    pub fn minter(&self) -> &TokenMinter {
        &self.minter
    }

    /// Mints a token and populates its feed.
    ///
    /// Nothing is cached if the fetch fails.
    pub async fn create_feed(&self) -> FeedResult<String> {
        let token = self.minter.mint();
        self.generate(&token).await?;
        info!(token = %redact(&token), "Created feed");
        Ok(token)
    }

    /// Resolves `token` to its document, regenerating it when stale.
    ///
    /// A failed regeneration leaves the stale entry untouched so a later read
    /// can try again.
    pub async fn read_feed(&self, token: &str) -> FeedResult<Arc<str>> {
        if !self.minter.is_well_formed(token) {
            debug!("Rejected malformed token");
            return Err(FeedError::TokenNotFound);
        }

        let entry = self
            .cache
            .read()
            .await
            .lookup(token)
            .ok_or(FeedError::TokenNotFound)?;

        if !entry.is_expired() {
            debug!(token = %redact(token), "Serving cached feed");
            return Ok(entry.document().clone());
        }

        debug!(token = %redact(token), updated_at = %entry.updated_at, "Feed is stale, regenerating");
        self.generate(token).await
    }

    /// Fetches, encodes and stores a document for `token`.
    ///
    /// The cache lock is only taken for the final store.
    async fn generate(&self, token: &str) -> FeedResult<Arc<str>> {
        let entries = self.source.fetch_entries().await.map_err(|e| {
            warn!(
                token = %redact(token),
                source = self.source.name(),
                error = %e,
                "Could not fetch entries"
            );
            FeedError::from(e)
        })?;

        let document: Arc<str> = Arc::from(encode_calendar(&entries));

        let entry = self.cache.write().await.store(token, document);
        debug!(
            token = %redact(token),
            entries = entries.len(),
            ttl_secs = entry.time_until_expiry().as_secs(),
            "Stored feed document"
        );
        Ok(entry.document().clone())
    }
}
