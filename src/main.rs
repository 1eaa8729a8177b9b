use std::sync::Arc;

use feedreader::config::Config;
use feedreader::container::DisplayContainer;
use feedreader::loader::FeedLoader;
use feedreader::routes::{self, AppState};
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feedreader=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("FEEDREADER_CONFIG").unwrap_or_else(|_| "feeds.toml".to_string());
    let config = Config::load(&config_path)?;
    let registry = Arc::new(config.registry()?);
    info!("Loaded {} feeds from {}", registry.len(), config_path);

    let container = Arc::new(RwLock::new(DisplayContainer::new()));
    let loader = FeedLoader::from_config(&config, registry, container)?;

    // Initial load of the first feed
    loader.load_feed_then(0, |result| match result {
        Ok(report) => info!(
            "Initial feed '{}' ready with {} entries",
            report.feed_name, report.entries
        ),
        Err(e) => error!("Initial feed load failed: {}", e),
    });

    let state = Arc::new(AppState::new(loader));
    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Server starting on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
