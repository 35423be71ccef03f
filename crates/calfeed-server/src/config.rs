//! Server configuration.
//!
//! All settings live in a single `config.toml`, by default at
//! `~/.config/calfeed/config.toml`. Every section and key is optional.
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//!
//! [cache]
//! ttl_secs = 300
//!
//! [token]
//! length = 20
//!
//! [upstream]
//! url = "https://example.com/entries.json"
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use calfeed_core::{TracingConfig, TracingOutputFormat, parse_level};
use calfeed_providers::HttpSourceConfig;

use crate::cache::DEFAULT_TTL;
use crate::error::{ServerError, ServerResult};
use crate::token::DEFAULT_TOKEN_BYTES;

/// Upstream used when none is configured.
pub const DEFAULT_UPSTREAM_URL: &str = "http://www.mocky.io/v2/5a88375b3000007e007f9401";

/// Default listening address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

/// Configuration for the feed server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// HTTP listener settings.
    pub server: ServerSettings,

    /// Feed cache settings.
    pub cache: CacheSettings,

    /// Token settings.
    pub token: TokenSettings,

    /// Upstream data source settings.
    pub upstream: UpstreamSettings,

    /// Log output settings.
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind, e.g. `127.0.0.1:8080`.
    pub listen: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

/// Feed cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds before a cached document goes stale.
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL.as_secs(),
        }
    }
}

/// Token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// Random bytes per token; tokens are twice as many hex characters.
    pub length: usize,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            length: DEFAULT_TOKEN_BYTES,
        }
    }
}

/// Upstream data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Endpoint returning the JSON entry list.
    pub url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User agent override.
    pub user_agent: Option<String>,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_secs: HttpSourceConfig::DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is unset.
    pub level: String,

    /// Output format.
    pub format: TracingOutputFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: TracingOutputFormat::Compact,
        }
    }
}

impl FeedConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> ServerResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> ServerResult<Self> {
        toml::from_str(content)
            .map_err(|e| ServerError::config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calfeed")
            .join("config.toml")
    }

    /// Checks every setting, reporting the first invalid one.
    pub fn validate(&self) -> ServerResult<()> {
        self.listen_addr()?;
        if self.cache.ttl_secs == 0 {
            return Err(ServerError::config("cache.ttl_secs must be greater than 0"));
        }
        if self.token.length == 0 {
            return Err(ServerError::config("token.length must be greater than 0"));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(ServerError::config(
                "upstream.timeout_secs must be greater than 0",
            ));
        }
        self.source_config()?;
        self.tracing_config()?;
        Ok(())
    }

    /// Parsed listening address.
    pub fn listen_addr(&self) -> ServerResult<SocketAddr> {
        self.server.listen.parse().map_err(|e| {
            ServerError::config(format!(
                "invalid server.listen '{}': {}",
                self.server.listen, e
            ))
        })
    }

    /// Cache time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Builds the HTTP source configuration.
    pub fn source_config(&self) -> ServerResult<HttpSourceConfig> {
        let config = HttpSourceConfig::new(&self.upstream.url).map_err(|e| {
            ServerError::config(format!("invalid upstream.url '{}': {}", self.upstream.url, e))
        })?;
        let config = config.with_timeout(Duration::from_secs(self.upstream.timeout_secs));
        Ok(match self.upstream.user_agent {
            Some(ref agent) => config.with_user_agent(agent),
            None => config,
        })
    }

    /// Builds the tracing configuration.
    pub fn tracing_config(&self) -> ServerResult<TracingConfig> {
        let level = parse_level(&self.logging.level)
            .map_err(|e| ServerError::config(format!("invalid logging.level: {}", e)))?;
        Ok(TracingConfig::server()
            .with_level(level)
            .with_format(self.logging.format))
    }

    /// Builder: set listening address.
    pub fn with_listen(mut self, listen: impl Into<String>) -> Self {
        self.server.listen = listen.into();
        self
    }

    /// Builder: set cache TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl_secs = ttl.as_secs();
        self
    }

    /// Builder: set token byte length.
    pub fn with_token_length(mut self, length: usize) -> Self {
        self.token.length = length;
        self
    }

    /// Builder: set upstream URL.
    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream.url = url.into();
        self
    }

    /// Builder: set log format.
    pub fn with_log_format(mut self, format: TracingOutputFormat) -> Self {
        self.logging.format = format;
        self
    }
}
