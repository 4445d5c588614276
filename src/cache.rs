//! Read-through freshness cache over the extraction pipeline.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::fallback::fallback_listings;
use crate::models::RawListing;
use crate::scrapers::traits::{ContentSource, ListingExtractor};

/// How long a successful extraction stays authoritative.
const FRESHNESS_MINUTES: i64 = 30;

struct CacheEntry {
    fetched_at: DateTime<Utc>,
    listings: Vec<RawListing>,
}

/// Snapshot of cache state for the status endpoint.
#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub last_fetched: Option<DateTime<Utc>>,
    pub cached_count: usize,
    pub is_recent: bool,
}

/// Caches the most recent successful extraction for a fixed window.
///
/// Failures never propagate to the listing path: a stale entry is served
/// if one exists, otherwise the static fallback set. Concurrent refreshes
/// are not de-duplicated; the cache write is last-writer-wins.
pub struct ListingCache {
    source: Arc<dyn ContentSource>,
    extractor: Arc<dyn ListingExtractor>,
    window: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl ListingCache {
    pub fn new(source: Arc<dyn ContentSource>, extractor: Arc<dyn ListingExtractor>) -> Self {
        Self::with_window(source, extractor, Duration::minutes(FRESHNESS_MINUTES))
    }

    pub fn with_window(
        source: Arc<dyn ContentSource>,
        extractor: Arc<dyn ListingExtractor>,
        window: Duration,
    ) -> Self {
        Self {
            source,
            extractor,
            window,
            entry: Mutex::new(None),
        }
    }

    /// Current listings: cached when fresh, freshly extracted when stale,
    /// degrading to stale-then-fallback data on any failure.
    pub async fn get_listings(&self) -> Vec<RawListing> {
        if let Some(listings) = self.fresh_listings() {
            return listings;
        }

        match self.refresh().await {
            Ok(listings) => listings,
            Err(err) => {
                warn!(error = %err, "listing refresh failed, serving degraded data");
                self.stale_or_fallback()
            }
        }
    }

    /// Refresh regardless of freshness. Errors propagate to the caller;
    /// used by the manual re-scrape endpoint.
    pub async fn force_refresh(&self) -> Result<Vec<RawListing>, ScrapeError> {
        self.refresh().await
    }

    pub fn status(&self) -> CacheStatus {
        let guard = self.entry.lock().unwrap();
        match guard.as_ref() {
            Some(entry) => CacheStatus {
                last_fetched: Some(entry.fetched_at),
                cached_count: entry.listings.len(),
                is_recent: Utc::now() - entry.fetched_at < self.window,
            },
            None => CacheStatus {
                last_fetched: None,
                cached_count: 0,
                is_recent: false,
            },
        }
    }

    fn fresh_listings(&self) -> Option<Vec<RawListing>> {
        let guard = self.entry.lock().unwrap();
        guard
            .as_ref()
            .filter(|entry| Utc::now() - entry.fetched_at < self.window)
            .map(|entry| entry.listings.clone())
    }

    async fn refresh(&self) -> Result<Vec<RawListing>, ScrapeError> {
        let content = self.source.fetch_content().await?;
        let listings = self.extractor.extract(&content).await?;

        if listings.is_empty() {
            return Err(ScrapeError::Empty);
        }

        info!(
            count = listings.len(),
            strategy = self.extractor.source_name(),
            "listing extraction succeeded"
        );

        let mut guard = self.entry.lock().unwrap();
        *guard = Some(CacheEntry {
            fetched_at: Utc::now(),
            listings: listings.clone(),
        });

        Ok(listings)
    }

    fn stale_or_fallback(&self) -> Vec<RawListing> {
        let guard = self.entry.lock().unwrap();
        match guard.as_ref() {
            Some(entry) => entry.listings.clone(),
            None => fallback_listings(),
        }
    }
}
