//! Token-scoped feed cache with TTL (Time-To-Live) support.
//!
//! Expiry is lazy: nothing is ever evicted. A stale entry stays in place until
//! a read regenerates it and [`FeedCache::store`] overwrites it.
//!
//! `FeedCache` itself is a plain map; sharing across request tasks goes
//! through [`SharedFeedCache`], whose lock makes every `store` and `lookup`
//! atomic. Callers must not hold the lock across an upstream fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::token::redact;

/// Default time-to-live for cached documents.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cached calendar document for one token.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    token: String,
    document: Arc<str>,
    /// When the document was generated.
    pub updated_at: DateTime<Utc>,
    /// Monotonic expiry, always `generation time + ttl`.
    expires_at: Instant,
}

impl FeedEntry {
    fn new(token: String, document: Arc<str>, ttl: Duration) -> Self {
        Self {
            token,
            document,
            updated_at: Utc::now(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn update(&mut self, document: Arc<str>, ttl: Duration) {
        self.document = document;
        self.updated_at = Utc::now();
        self.expires_at = Instant::now() + ttl;
    }

    /// The token this entry belongs to.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The cached calendar document.
    pub fn document(&self) -> &Arc<str> {
        &self.document
    }

    /// When the entry goes stale.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns true once the expiry has passed.
    pub fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }

    /// Returns the time until expiration.
    pub fn time_until_expiry(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Entry counts, split by freshness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub fresh: usize,
    pub stale: usize,
}

/// Map from token to cached feed document.
#[derive(Debug)]
pub struct FeedCache {
    ttl: Duration,
    entries: HashMap<String, FeedEntry>,
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl FeedCache {
    /// Creates a new cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the TTL applied by [`store`](Self::store).
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Looks up the entry for `token`, fresh or stale.
    ///
    /// The returned entry is a snapshot; the document is shared, not copied.
    pub fn lookup(&self, token: &str) -> Option<FeedEntry> {
        let entry = self.entries.get(token).cloned();
        trace!(token = %redact(token), hit = entry.is_some(), "Cache lookup");
        entry
    }

    /// Inserts or overwrites the entry for `token`, expiring `ttl` from now.
    pub fn store(&mut self, token: &str, document: impl Into<Arc<str>>) -> FeedEntry {
        let document = document.into();
        let ttl = self.ttl;

        if let Some(entry) = self.entries.get_mut(token) {
            entry.update(document, ttl);
            debug!(token = %redact(token), "Updated cache entry");
            entry.clone()
        } else {
            let entry = FeedEntry::new(token.to_string(), document, ttl);
            self.entries.insert(token.to_string(), entry.clone());
            debug!(token = %redact(token), "Inserted new cache entry");
            entry
        }
    }

    /// Returns the number of cache entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts entries by freshness.
    pub fn stats(&self) -> CacheStats {
        let stale = self.entries.values().filter(|e| e.is_expired()).count();
        CacheStats {
            total: self.entries.len(),
            fresh: self.entries.len() - stale,
            stale,
        }
    }
}

/// Cache shared between request handlers.
pub type SharedFeedCache = Arc<RwLock<FeedCache>>;

/// Creates a new shared cache with the given TTL.
pub fn new_shared_cache(ttl: Duration) -> SharedFeedCache {
    Arc::new(RwLock::new(FeedCache::new(ttl)))
}
