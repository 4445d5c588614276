use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::ScrapeError;
use crate::scrapers::traits::ContentSource;

/// HTTP fetcher for the brokerage listing page.
pub struct ListingSource {
    client: Client,
    url: String,
}

impl ListingSource {
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl ContentSource for ListingSource {
    async fn fetch_content(&self) -> Result<String, ScrapeError> {
        debug!("Fetching listing page: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            warn!("Listing source returned status: {}", response.status());
            return Err(ScrapeError::Network(format!(
                "listing page returned {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        debug!("Downloaded {} bytes of listing content", body.len());
        Ok(body)
    }
}
