use async_trait::async_trait;

use crate::error::ScrapeError;
use crate::models::RawListing;

/// Source of raw page content, usually a network fetch of the brokerage
/// search page. Split out so the cache can be exercised without I/O.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_content(&self) -> Result<String, ScrapeError>;
}

/// Common contract for extraction strategies.
///
/// A strategy either returns fully-formed records or fails; it never emits
/// partially malformed entries. Strategies are interchangeable behind this
/// trait so the cache and normalizer never care which one is configured.
#[async_trait]
pub trait ListingExtractor: Send + Sync {
    async fn extract(&self, content: &str) -> Result<Vec<RawListing>, ScrapeError>;

    /// Name of the strategy, for logging.
    fn source_name(&self) -> &'static str;
}
