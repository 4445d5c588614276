//! In-memory property store, lazily populated from the listing cache.

use std::sync::RwLock;

use tracing::info;

use crate::cache::{CacheStatus, ListingCache};
use crate::error::ScrapeError;
use crate::models::Property;
use crate::normalize::normalize;

/// Keyed collection of canonical properties.
///
/// Starts empty and populates once from the cache on first read; after
/// that it only changes through `replace_all`, which swaps the whole
/// collection atomically. It never reverts to empty during the process
/// lifetime.
pub struct PropertyStore {
    cache: ListingCache,
    properties: RwLock<Vec<Property>>,
}

impl PropertyStore {
    pub fn new(cache: ListingCache) -> Self {
        Self {
            cache,
            properties: RwLock::new(Vec::new()),
        }
    }

    /// Current collection, populating from the cache when empty.
    pub async fn list(&self) -> Vec<Property> {
        {
            let guard = self.properties.read().unwrap();
            if !guard.is_empty() {
                return guard.clone();
            }
        }

        let raw = self.cache.get_listings().await;
        let normalized: Vec<Property> = raw.into_iter().map(normalize).collect();
        info!(count = normalized.len(), "property store populated");

        let mut guard = self.properties.write().unwrap();
        if guard.is_empty() {
            *guard = normalized;
        }
        guard.clone()
    }

    /// Case-insensitive substring search over title, address, description
    /// and feature tags (OR), intersected with an optional price ceiling.
    pub async fn search(&self, query: &str, max_price: Option<i64>) -> Vec<Property> {
        let needle = query.to_lowercase();

        self.list()
            .await
            .into_iter()
            .filter(|property| {
                let within_price = max_price.is_none_or(|cap| property.price <= cap);
                within_price && (needle.is_empty() || matches_text(property, &needle))
            })
            .collect()
    }

    /// Swap the entire collection in one write. Concurrent readers see
    /// either the old or the new collection, never a mix.
    pub fn replace_all(&self, properties: Vec<Property>) {
        *self.properties.write().unwrap() = properties;
    }

    pub fn get(&self, id: &str) -> Option<Property> {
        self.properties
            .read()
            .unwrap()
            .iter()
            .find(|property| property.id == id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.properties.read().unwrap().len()
    }

    /// Bypass the freshness window and rebuild the collection. Extraction
    /// errors propagate; the previous collection stays in place on failure.
    pub async fn rescrape(&self) -> Result<usize, ScrapeError> {
        let raw = self.cache.force_refresh().await?;
        let normalized: Vec<Property> = raw.into_iter().map(normalize).collect();
        let count = normalized.len();
        self.replace_all(normalized);
        Ok(count)
    }

    pub fn cache_status(&self) -> CacheStatus {
        self.cache.status()
    }
}

fn matches_text(property: &Property, needle: &str) -> bool {
    property.title.to_lowercase().contains(needle)
        || property.address.to_lowercase().contains(needle)
        || property
            .description
            .as_deref()
            .is_some_and(|text| text.to_lowercase().contains(needle))
        || property
            .features
            .as_deref()
            .is_some_and(|tags| tags.iter().any(|tag| tag.to_lowercase().contains(needle)))
}
