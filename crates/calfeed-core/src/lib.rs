//! Core types: calendar entries, ICS encoding, tracing

pub mod entry;
pub mod ics;
pub mod tracing;

pub use entry::CalendarEntry;
pub use ics::encode_calendar;
pub use self::tracing::{
    TracingConfig, TracingError, TracingOutputFormat, init_tracing, parse_level,
};
