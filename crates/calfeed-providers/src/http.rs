//! HTTP/JSON entry source.
//!
//! Issues a `GET` against the configured URL and expects a `200` with a JSON
//! array of `{dateStart, dateEnd, description}` objects.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, trace, warn};
use url::Url;

use calfeed_core::CalendarEntry;

use crate::error::{ProviderError, ProviderResult};
use crate::source::{BoxFuture, EntrySource};

const PROVIDER_NAME: &str = "http";

/// Configuration for the HTTP entry source.
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Upstream endpoint returning the entry list.
    pub url: Url,

    /// Request timeout, covering connect and body download.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl HttpSourceConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new configuration for the given URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(url.as_ref())?;
        Ok(Self {
            url: parsed,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calfeed/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the URL as a string.
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Entry source backed by an HTTP/JSON endpoint.
pub struct HttpEntrySource {
    client: Client,
    config: HttpSourceConfig,
}

impl HttpEntrySource {
    /// Creates a new HTTP source with the given configuration.
    pub fn new(config: HttpSourceConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("Failed to create HTTP client: {}", e))
                    .with_provider(PROVIDER_NAME)
            })?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    async fn fetch(&self) -> ProviderResult<Vec<CalendarEntry>> {
        let url = self.config.url_str();
        trace!(url = %url, "Sending request");

        let response = self.client.get(url).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("Request timed out after {:?}", self.config.timeout)
            } else {
                format!("Request failed: {}", e)
            };
            ProviderError::network(message)
                .with_provider(PROVIDER_NAME)
                .with_source(e)
        })?;

        let status = response.status();
        trace!(status = %status, "Received response");

        match status {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(ProviderError::not_found(format!("Upstream {} not found", url))
                    .with_provider(PROVIDER_NAME));
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %s, body = %body, "Unexpected upstream status");
                return Err(
                    ProviderError::server(format!("Upstream returned status {}", s))
                        .with_provider(PROVIDER_NAME),
                );
            }
        }

        let body = response.bytes().await.map_err(|e| {
            ProviderError::network(format!("Failed to read response: {}", e))
                .with_provider(PROVIDER_NAME)
                .with_source(e)
        })?;

        let entries = parse_entries(&body)?;
        debug!(url = %url, count = entries.len(), "Fetched entries");
        Ok(entries)
    }
}

impl EntrySource for HttpEntrySource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_entries(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEntry>>> {
        Box::pin(self.fetch())
    }
}

/// Decodes the upstream JSON payload.
pub fn parse_entries(body: &[u8]) -> ProviderResult<Vec<CalendarEntry>> {
    serde_json::from_slice(body).map_err(|e| {
        ProviderError::invalid_response(format!("Could not decode entries: {}", e))
            .with_provider(PROVIDER_NAME)
            .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TWO_ENTRIES: &str = r#"[
        {"dateStart": "2018-02-17T10:00:00Z", "dateEnd": "2018-02-17T11:00:00Z", "description": "A"},
        {"dateStart": "2018-02-17T12:00:00+02:00", "dateEnd": "2018-02-17T13:00:00+02:00", "description": "B"}
    ]"#;

    async fn source_for(server: &MockServer) -> HttpEntrySource {
        let config = HttpSourceConfig::new(format!("{}/entries", server.uri()))
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        HttpEntrySource::new(config).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = HttpSourceConfig::new("http://upstream.example.com/entries").unwrap();
        assert_eq!(config.url_str(), "http://upstream.example.com/entries");
        assert_eq!(
            config.timeout,
            Duration::from_secs(HttpSourceConfig::DEFAULT_TIMEOUT_SECS)
        );
        assert!(config.user_agent.starts_with("calfeed/"));
    }

    #[test]
    fn config_builder_methods() {
        let config = HttpSourceConfig::new("http://upstream.example.com/")
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn invalid_url_returns_error() {
        assert!(HttpSourceConfig::new("not a valid url").is_err());
    }

    #[test]
    fn parse_entries_rejects_malformed_json() {
        let err = parse_entries(b"{\"not\": \"an array\"}").unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
    }

    #[tokio::test]
    async fn fetch_parses_entries_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/entries"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_ENTRIES))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server).await;
        let entries = source.fetch_entries().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "A");
        assert_eq!(entries[1].description, "B");
        assert_eq!(
            entries[1].start,
            Utc.with_ymd_and_hms(2018, 2, 17, 10, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn fetch_maps_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_entries().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ServerError);
        assert_eq!(err.provider(), Some("http"));
    }

    #[tokio::test]
    async fn fetch_treats_other_success_codes_as_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_entries().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ServerError);
    }

    #[tokio::test]
    async fn fetch_maps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_entries().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
    }

    #[tokio::test]
    async fn fetch_maps_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_entries().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(err.code().is_decode_failure());
    }

    #[tokio::test]
    async fn fetch_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = HttpSourceConfig::new(server.uri())
            .unwrap()
            .with_timeout(Duration::from_millis(50));
        let source = HttpEntrySource::new(config).unwrap();

        let err = source.fetch_entries().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NetworkError);
        assert!(err.message().contains("timed out"));
    }

    #[tokio::test]
    async fn fetch_reports_connection_failure() {
        // Nothing listens on port 9 (discard) in the test environment
        let config = HttpSourceConfig::new("http://127.0.0.1:9/entries")
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        let source = HttpEntrySource::new(config).unwrap();

        let err = source.fetch_entries().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NetworkError);
    }
}
