use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ScrapeError;
use crate::models::Property;
use crate::store::PropertyStore;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<i64>,
}

#[derive(Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    pub properties_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ScraperStatus {
    /// Epoch milliseconds of the last successful scrape, 0 when none.
    pub last_scrape_time: i64,
    pub last_scrape_formatted: String,
    pub cached_properties_count: usize,
    pub is_recent: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Full listing feed; populates the store on first hit.
pub async fn list_properties(State(store): State<Arc<PropertyStore>>) -> Json<Vec<Property>> {
    Json(store.list().await)
}

pub async fn search_properties(
    State(store): State<Arc<PropertyStore>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<Property>> {
    Json(store.search(&params.q, params.max_price).await)
}

/// Manual re-scrape: bypasses the freshness window and swaps the whole
/// collection. The only place pipeline errors surface to a client; the
/// listing feed keeps serving previous data regardless.
pub async fn scrape_railey(
    State(store): State<Arc<PropertyStore>>,
) -> (StatusCode, Json<ScrapeResponse>) {
    match store.rescrape().await {
        Ok(count) => {
            info!(count, "manual re-scrape succeeded");
            (
                StatusCode::OK,
                Json(ScrapeResponse {
                    success: true,
                    message: format!("Scraped {count} properties"),
                    timestamp: Utc::now().to_rfc3339(),
                    properties_count: count,
                    error: None,
                }),
            )
        }
        Err(err) => {
            error!(error = %err, "manual re-scrape failed");
            let status = match err {
                ScrapeError::Service(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ScrapeResponse {
                    success: false,
                    message: "Scrape failed; previous data remains available".to_string(),
                    timestamp: Utc::now().to_rfc3339(),
                    properties_count: store.count(),
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}

pub async fn scraper_status(State(store): State<Arc<PropertyStore>>) -> Json<ScraperStatus> {
    let status = store.cache_status();

    let (last_scrape_time, last_scrape_formatted) = match status.last_fetched {
        Some(fetched_at) => (
            fetched_at.timestamp_millis(),
            fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        None => (0, "never".to_string()),
    };

    Json(ScraperStatus {
        last_scrape_time,
        last_scrape_formatted,
        cached_properties_count: status.cached_count,
        is_recent: status.is_recent,
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
