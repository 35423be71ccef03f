//! Server error types.

use std::io;
use thiserror::Error;

use calfeed_providers::ProviderError;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Process-level errors: start-up, configuration, binding.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (socket, file, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Tracing could not be initialised.
    #[error("Tracing error: {0}")]
    Tracing(#[from] calfeed_core::TracingError),

    /// The entry source could not be constructed.
    #[error("Entry source error: {0}")]
    Source(#[source] ProviderError),

    /// Listening address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a bind error.
    pub fn bind(addr: impl Into<String>, source: io::Error) -> Self {
        Self::Bind {
            addr: addr.into(),
            source,
        }
    }
}

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors returned by the feed service. All are terminal for the request.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Upstream unreachable or answered with a non-success status.
    #[error("fetch failed: {0}")]
    FetchFailed(#[source] ProviderError),

    /// Upstream answered but the payload could not be decoded.
    #[error("decode failed: {0}")]
    DecodeFailed(#[source] ProviderError),

    /// No feed has been created for this token.
    #[error("no feed for token")]
    TokenNotFound,
}

impl FeedError {
    /// Short, client-facing description. Never includes upstream details.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::FetchFailed(_) | Self::DecodeFailed(_) => "Could not create feed",
            Self::TokenNotFound => "No Feed for this Token",
        }
    }
}

impl From<ProviderError> for FeedError {
    fn from(err: ProviderError) -> Self {
        if err.code().is_decode_failure() {
            Self::DecodeFailed(err)
        } else {
            Self::FetchFailed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_feed_errors() {
        let err: FeedError = ProviderError::network("refused").into();
        assert!(matches!(err, FeedError::FetchFailed(_)));

        let err: FeedError = ProviderError::server("status 500").into();
        assert!(matches!(err, FeedError::FetchFailed(_)));

        let err: FeedError = ProviderError::not_found("gone").into();
        assert!(matches!(err, FeedError::FetchFailed(_)));

        let err: FeedError = ProviderError::invalid_response("bad json").into();
        assert!(matches!(err, FeedError::DecodeFailed(_)));
    }

    #[test]
    fn public_message_hides_cause() {
        let err: FeedError = ProviderError::network("10.0.0.3:443 refused").into();
        assert_eq!(err.public_message(), "Could not create feed");
        assert!(err.to_string().contains("10.0.0.3"));

        assert_eq!(FeedError::TokenNotFound.public_message(), "No Feed for this Token");
    }

    #[test]
    fn server_error_display() {
        let err = ServerError::config("ttl must be positive");
        assert_eq!(err.to_string(), "Configuration error: ttl must be positive");

        let err = ServerError::bind("0.0.0.0:80", io::Error::other("denied"));
        assert!(err.to_string().contains("0.0.0.0:80"));
    }
}
