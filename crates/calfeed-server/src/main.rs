//! calfeed server entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use calfeed_core::init_tracing;
use calfeed_providers::HttpEntrySource;
use calfeed_server::{
    Cli, FeedServer, FeedService, ServerError, ServerResult, SignalHandler, TokenMinter,
    new_shared_cache,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ServerResult<()> {
    let config = cli.load_config()?;
    config.validate()?;

    init_tracing(cli.tracing_config(&config)?)?;

    let source = HttpEntrySource::new(config.source_config()?).map_err(ServerError::Source)?;
    let service = FeedService::new(
        Arc::new(source),
        new_shared_cache(config.ttl()),
        TokenMinter::new(config.token.length),
    );

    info!(
        upstream = %config.upstream.url,
        ttl_secs = config.cache.ttl_secs,
        "Starting calfeed"
    );

    let signals = SignalHandler::new();
    signals.spawn_listener();

    FeedServer::new(service)
        .run(config.listen_addr()?, signals.shutdown())
        .await
}
