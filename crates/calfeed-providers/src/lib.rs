//! EntrySource trait and implementations.
//!
//! - [`EntrySource`] - the data fetcher abstraction the feed service pulls from
//! - [`HttpEntrySource`] - fetches a JSON entry list over HTTP
//! - [`StaticEntrySource`] / [`ErrorSource`] - fixed and failing sources
//! - [`ProviderError`] - error type for fetch operations
//!
//! ```text
//! ┌──────────────────┐
//! │ upstream (JSON)  │
//! └────────┬─────────┘
//!          │ GET
//!          ▼
//! ┌──────────────────┐
//! │ HttpEntrySource  │
//! └────────┬─────────┘
//!          │  EntrySource
//!          ▼
//!  Vec<CalendarEntry>
//! ```

pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod source;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
#[cfg(feature = "http")]
pub use http::{HttpEntrySource, HttpSourceConfig, parse_entries};
pub use source::{BoxFuture, EntrySource, ErrorSource, StaticEntrySource};
