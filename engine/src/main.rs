// Engine main entry point
use engine::config::settings::EngineSettings;
use engine::data::HistoryStore;
use engine::fetch::HttpBarSource;
use engine::services::market_cache_service::MarketCacheEngine;
use engine::services::range_fetch::RangeFetcher;
use engine::services::MarketCacheServer;
use std::sync::Arc;
use tonic::transport::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting bar cache engine...");

    let settings = EngineSettings::load()?;
    std::fs::create_dir_all(&settings.data_dir)?;
    info!(data_dir = %settings.data_dir.display(), "Using data directory");

    let addr = settings.listen_addr().parse()?;
    info!("Engine will listen on {}", addr);

    let source = Arc::new(HttpBarSource::new(&settings.upstream)?);
    let store = HistoryStore::new(settings.data_dir.clone());
    store.clean_up_interrupted_writes()?;
    let fetcher = RangeFetcher::new(store, source)
        .with_max_segment_days(settings.max_segment_days);
    let service = MarketCacheEngine::new(fetcher);

    Server::builder()
        .add_service(MarketCacheServer::new(service))
        .serve(addr)
        .await?;

    Ok(())
}
