//! Command-line interface definition.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use calfeed_core::{TracingConfig, TracingOutputFormat};

use crate::config::FeedConfig;
use crate::error::ServerResult;

/// calfeed - Token-scoped calendar feeds
#[derive(Debug, Parser)]
#[command(name = "calfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, short, env = "CALFEED_LISTEN")]
    pub listen: Option<String>,

    /// Endpoint returning the JSON entry list
    #[arg(long, env = "CALFEED_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Seconds before a cached feed goes stale
    #[arg(long)]
    pub ttl_secs: Option<u64>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log output format
    #[arg(long, value_parser = parse_format)]
    pub log_format: Option<TracingOutputFormat>,
}

fn parse_format(s: &str) -> Result<TracingOutputFormat, String> {
    s.parse()
}

impl Cli {
    /// Loads the configuration file and layers the command-line overrides on top.
    pub fn load_config(&self) -> ServerResult<FeedConfig> {
        let config = match self.config {
            Some(ref path) => FeedConfig::load_from(path)?,
            None => FeedConfig::load()?,
        };
        Ok(self.apply(config))
    }

    /// Applies command-line overrides to `config`.
    pub fn apply(&self, mut config: FeedConfig) -> FeedConfig {
        if let Some(ref listen) = self.listen {
            config = config.with_listen(listen);
        }
        if let Some(ref url) = self.upstream_url {
            config = config.with_upstream_url(url);
        }
        if let Some(secs) = self.ttl_secs {
            config = config.with_ttl(Duration::from_secs(secs));
        }
        if let Some(format) = self.log_format {
            config = config.with_log_format(format);
        }
        config
    }

    /// Resolves the tracing configuration, `--debug` taking precedence.
    pub fn tracing_config(&self, config: &FeedConfig) -> ServerResult<TracingConfig> {
        if self.debug {
            return Ok(TracingConfig::debug());
        }
        config.tracing_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_defaults() {
        let cli = Cli::try_parse_from(["calfeed"]).unwrap();
        assert!(cli.listen.is_none());
        assert!(cli.ttl_secs.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "calfeed",
            "--listen",
            "127.0.0.1:9090",
            "--upstream-url",
            "http://localhost:3000/entries",
            "--ttl-secs",
            "15",
            "--log-format",
            "json",
        ])
        .unwrap();

        let config = cli.apply(FeedConfig::default());
        assert_eq!(config.server.listen, "127.0.0.1:9090");
        assert_eq!(config.upstream.url, "http://localhost:3000/entries");
        assert_eq!(config.ttl(), Duration::from_secs(15));
        assert_eq!(config.logging.format, TracingOutputFormat::Json);
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let cli = Cli::try_parse_from(["calfeed"]).unwrap();
        let config = cli.apply(FeedConfig::default().with_ttl(Duration::from_secs(42)));
        assert_eq!(config.ttl(), Duration::from_secs(42));
    }

    #[test]
    fn invalid_log_format_rejected() {
        assert!(Cli::try_parse_from(["calfeed", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn load_config_from_file_then_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nttl_secs = 120\n\n[server]\nlisten = \"127.0.0.1:8181\"").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["calfeed", "--config", &path, "--ttl-secs", "10"]).unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.ttl(), Duration::from_secs(10));
        assert_eq!(config.server.listen, "127.0.0.1:8181");
    }

    #[test]
    fn debug_flag_wins() {
        let cli = Cli::try_parse_from(["calfeed", "--debug"]).unwrap();
        let tracing = cli.tracing_config(&FeedConfig::default()).unwrap();
        assert_eq!(tracing.default_level, tracing::Level::DEBUG);
    }
}
