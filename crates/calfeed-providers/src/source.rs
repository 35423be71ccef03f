//! EntrySource trait definition.
//!
//! An [`EntrySource`] is the data fetcher behind every feed: it returns the
//! ordered list of [`CalendarEntry`] values that get encoded into a document.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use calfeed_core::CalendarEntry;

use crate::error::{ProviderError, ProviderResult};

/// A boxed future for async trait methods.
///
/// Keeps [`EntrySource`] object-safe so the server can hold an
/// `Arc<dyn EntrySource>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A source of calendar entries.
///
/// Implementations must be `Send + Sync`: one source is shared by every
/// request handler. Each call to [`fetch_entries`](Self::fetch_entries) is a
/// fresh fetch; sources do not cache.
pub trait EntrySource: Send + Sync {
    /// Returns the name/type of this source (e.g. "http").
    fn name(&self) -> &str;

    /// Fetches the current list of entries, in upstream order.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network failures, non-success upstream
    /// statuses, or malformed payloads.
    fn fetch_entries(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEntry>>>;
}

/// A source that serves a fixed list of entries.
///
/// Counts fetches, which makes it handy for checking how often the upstream
/// is actually hit.
#[derive(Debug, Default)]
pub struct StaticEntrySource {
    entries: Vec<CalendarEntry>,
    fetches: AtomicUsize,
}

impl StaticEntrySource {
    /// Creates a source returning `entries` on every fetch.
    pub fn new(entries: Vec<CalendarEntry>) -> Self {
        Self {
            entries,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of completed fetches so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl EntrySource for StaticEntrySource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_entries(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEntry>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let entries = self.entries.clone();
        Box::pin(async move { Ok(entries) })
    }
}

/// A source that always returns an error.
///
/// Stands in for an upstream that is down or misconfigured.
#[derive(Debug)]
pub struct ErrorSource {
    name: String,
    error: ProviderError,
}

impl ErrorSource {
    /// Creates a new error source.
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl EntrySource for ErrorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_entries(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEntry>>> {
        // ProviderError is not Clone (boxed source), so rebuild it
        let error =
            ProviderError::new(self.error.code(), self.error.message()).with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}
