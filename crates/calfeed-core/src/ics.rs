//! iCalendar (RFC 5545) document encoding.
//!
//! Entries are wrapped in a single `VCALENDAR` (Gregorian scale) and each one
//! becomes a `VEVENT` with `DTSTART`, `DTEND` and `SUMMARY`. Events keep the
//! order in which the upstream returned them.
//!
//! The encoder library fills in a `DTSTAMP` of "now" and a random `UID` for
//! events that lack them. Both are set explicitly here so that the same input
//! always produces the same bytes.

use icalendar::{Calendar, Component, Event, EventLike};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::entry::CalendarEntry;

/// Domain part of generated event UIDs.
const UID_DOMAIN: &str = "calfeed";

/// Encodes entries into an iCalendar document.
pub fn encode_calendar(entries: &[CalendarEntry]) -> String {
    let mut calendar = Calendar::new();

    for (index, entry) in entries.iter().enumerate() {
        calendar.push(encode_event(index, entry));
    }

    let document = calendar.done().to_string();
    debug!(
        events = entries.len(),
        bytes = document.len(),
        "Encoded calendar document"
    );
    document
}

fn encode_event(index: usize, entry: &CalendarEntry) -> Event {
    Event::new()
        .uid(&event_uid(index, entry))
        .timestamp(entry.start)
        .starts(entry.start)
        .ends(entry.end)
        .summary(&entry.description)
        .done()
}

/// Derives a stable UID from an entry's position and content.
fn event_uid(index: usize, entry: &CalendarEntry) -> String {
    let mut hasher = Sha256::new();
    hasher.update((index as u64).to_le_bytes());
    hasher.update(entry.start.timestamp().to_le_bytes());
    hasher.update(entry.end.timestamp().to_le_bytes());
    hasher.update(entry.description.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}@{}", &digest[..32], UID_DOMAIN)
}
