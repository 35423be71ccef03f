//! Error types for entry source operations.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// Upstream answered with a non-success status.
    ServerError,
    /// Upstream body was not the expected JSON shape.
    InvalidResponse,
    /// Upstream resource not found (404).
    NotFound,
    /// Missing or invalid source configuration.
    ConfigurationError,
    /// Unexpected internal state.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }

    /// Returns true if the upstream was reached but sent unusable data.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::InvalidResponse)
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while fetching entries from a source.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// The source that generated this error (e.g. "http").
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Sets the provider name for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the provider name, if set.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_display() {
        assert_eq!(ProviderErrorCode::NetworkError.as_str(), "network_error");
        assert_eq!(
            ProviderErrorCode::InvalidResponse.to_string(),
            "invalid_response"
        );
    }

    #[test]
    fn only_invalid_response_is_decode_failure() {
        assert!(ProviderErrorCode::InvalidResponse.is_decode_failure());
        assert!(!ProviderErrorCode::NetworkError.is_decode_failure());
        assert!(!ProviderErrorCode::ServerError.is_decode_failure());
        assert!(!ProviderErrorCode::NotFound.is_decode_failure());
    }

    #[test]
    fn provider_error_with_provider() {
        let err = ProviderError::network("connection refused").with_provider("http");
        assert_eq!(err.code(), ProviderErrorCode::NetworkError);
        assert_eq!(err.message(), "connection refused");
        assert_eq!(err.provider(), Some("http"));
    }

    #[test]
    fn provider_error_display() {
        let err = ProviderError::server("status 503").with_provider("http");
        let display = err.to_string();
        assert!(display.contains("[http]"));
        assert!(display.contains("server_error"));
        assert!(display.contains("status 503"));
    }

    #[test]
    fn provider_error_with_source() {
        use std::error::Error;
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = ProviderError::invalid_response("bad body").with_source(json_err);
        assert!(err.source().is_some());
    }
}
