mod cache;
mod config;
mod error;
mod fallback;
mod models;
mod normalize;
mod scrapers;
mod server;
mod store;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cache::ListingCache;
use crate::config::{Config, ExtractionStrategy};
use crate::scrapers::{ContentSource, ListingExtractor, ListingSource, LlmExtractor, PatternExtractor};
use crate::store::PropertyStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    info!("🏠 Deep Creek Listings API");
    info!("Listing source: {}", config.source_url);

    let source: Arc<dyn ContentSource> = Arc::new(ListingSource::new(config.source_url.clone())?);

    let extractor: Arc<dyn ListingExtractor> = match config.strategy {
        ExtractionStrategy::Pattern => Arc::new(PatternExtractor::new()?),
        ExtractionStrategy::Llm => Arc::new(LlmExtractor::new(&config)?),
    };
    info!("Using {} extraction strategy", extractor.source_name());

    let cache = ListingCache::new(source, extractor);
    let store = Arc::new(PropertyStore::new(cache));

    let app = server::router(store);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
