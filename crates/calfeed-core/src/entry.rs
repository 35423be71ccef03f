//! Calendar entry type.
//!
//! A [`CalendarEntry`] is one time-stamped item as delivered by the upstream
//! data source. Entries are immutable once fetched and only exist as input
//! to [`encode_calendar`](crate::ics::encode_calendar).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry of a calendar feed.
///
/// Upstream timestamps may carry any UTC offset; they are normalised to UTC
/// on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// When the entry starts.
    #[serde(rename = "dateStart")]
    pub start: DateTime<Utc>,

    /// When the entry ends.
    #[serde(rename = "dateEnd")]
    pub end: DateTime<Utc>,

    /// Free-text description, used as the event summary.
    #[serde(default)]
    pub description: String,
}

impl CalendarEntry {
    /// Creates a new entry.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, description: impl Into<String>) -> Self {
        Self {
            start,
            end,
            description: description.into(),
        }
    }

    /// Returns the entry duration. Negative if the upstream sent `end < start`.
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}
