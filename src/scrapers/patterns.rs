use anyhow::{anyhow, Result};
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::ScrapeError;
use crate::models::RawListing;
use crate::normalize::coerce_price;
use crate::scrapers::enrich;
use crate::scrapers::traits::ListingExtractor;

/// Hard cap on records per extraction, bounding work on bloated pages.
pub const MAX_LISTINGS: usize = 50;

/// How far past an MLS match the detail patterns are allowed to look.
const DETAIL_WINDOW: usize = 2000;

/// Pattern-rule extraction strategy.
///
/// Scans the page text for MLS anchors and hunts the surrounding window
/// for price, address and bed/bath/sqft tokens. Listing photos are
/// associated by `img` alt text containing the MLS number; a category
/// placeholder fills in otherwise.
pub struct PatternExtractor {
    mls_re: Regex,
    price_re: Regex,
    address_re: Regex,
    beds_re: Regex,
    baths_re: Regex,
    sqft_re: Regex,
    href_re: Regex,
    img_selector: Selector,
}

impl PatternExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            mls_re: Regex::new(r"(?i)MLS\s*#?\s*:?\s*([A-Z0-9]{6,})")?,
            price_re: Regex::new(r"\$\s*([0-9][0-9,]*)")?,
            address_re: Regex::new(
                r"([0-9]{1,6}\s+[A-Za-z0-9 .'\-]+,\s*[A-Za-z .]+,\s*MD(?:\s+[0-9]{5})?)",
            )?,
            beds_re: Regex::new(r"(?i)([0-9]+)\s*(?:bed(?:room)?s?|bd|br)\b")?,
            baths_re: Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(?:bath(?:room)?s?|ba)\b")?,
            sqft_re: Regex::new(r"(?i)([0-9][0-9,]*)\s*(?:sq\.?\s*ft\.?|sqft|square\s+feet)")?,
            href_re: Regex::new(r#"href="([^"]+)""#)?,
            img_selector: Selector::parse("img")
                .map_err(|err| anyhow!("invalid img selector: {err}"))?,
        })
    }

    fn parse_window<'a>(&self, content: &'a str, start: usize) -> &'a str {
        let mut end = (start + DETAIL_WINDOW).min(content.len());
        while end < content.len() && !content.is_char_boundary(end) {
            end += 1;
        }
        &content[start..end]
    }

    fn find_listing_image(&self, document: &Html, mls: &str) -> Option<String> {
        let needle = mls.to_lowercase();
        document.select(&self.img_selector).find_map(|img| {
            let alt = img.value().attr("alt")?;
            if alt.to_lowercase().contains(&needle) {
                img.value().attr("src").map(str::to_string)
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl ListingExtractor for PatternExtractor {
    async fn extract(&self, content: &str) -> Result<Vec<RawListing>, ScrapeError> {
        let document = Html::parse_document(content);
        let mut listings = Vec::new();

        for caps in self.mls_re.captures_iter(content) {
            if listings.len() >= MAX_LISTINGS {
                break;
            }

            let mls = caps[1].to_string();
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let window = self.parse_window(content, start);

            let address = self
                .address_re
                .captures(window)
                .map(|c| c[1].trim().to_string())
                .unwrap_or_default();
            let price = self
                .price_re
                .captures(window)
                .map(|c| coerce_price(&c[1]))
                .unwrap_or(0);
            let bedrooms = self
                .beds_re
                .captures(window)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0);
            let bathrooms = self
                .baths_re
                .captures(window)
                .map(|c| c[1].to_string())
                .unwrap_or_else(|| "0".to_string());
            let sqft = self
                .sqft_re
                .captures(window)
                .map(|c| coerce_price(&c[1]))
                .filter(|value| *value > 0);

            // Only emit when there is minimum usable data.
            if address.is_empty() || (price == 0 && sqft.is_none()) {
                continue;
            }

            let listing_url = self
                .href_re
                .captures_iter(window)
                .map(|c| c[1].to_string())
                .find(|href| href.contains(&mls) || href.to_lowercase().contains("listing"));

            let mut features = Vec::new();
            enrich::apply_feature_tags(&mut features, &address, sqft, price);

            let image_url = self
                .find_listing_image(&document, &mls)
                .unwrap_or_else(|| enrich::placeholder_image(&features).to_string());

            let description = enrich::synthesize_description(price, &features);

            listings.push(RawListing {
                address,
                price,
                bedrooms,
                bathrooms,
                sqft,
                description,
                features,
                mls_number: Some(mls),
                listing_url,
                image_url,
            });
        }

        debug!("Pattern extraction found {} listings", listings.len());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_block(index: usize) -> String {
        format!(
            r#"<div class="listing">
  <h3>MLS#: MDGA21{index:05}</h3>
  <p>{} Deep Creek Dr, McHenry, MD 21541</p>
  <p>$450,000</p>
  <p>3 bed 2.5 bath 1,800 sqft</p>
  <a href="https://www.railey.com/listing/MDGA21{index:05}">View listing</a>
</div>
"#,
            100 + index
        )
    }

    fn page_with(count: usize) -> String {
        let blocks: String = (0..count).map(listing_block).collect();
        format!("<html><body>{blocks}</body></html>")
    }

    #[tokio::test]
    async fn extracts_all_structural_fields() {
        let extractor = PatternExtractor::new().unwrap();
        let listings = extractor.extract(&page_with(1)).await.unwrap();

        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.address, "100 Deep Creek Dr, McHenry, MD 21541");
        assert_eq!(listing.price, 450_000);
        assert_eq!(listing.bedrooms, 3);
        assert_eq!(listing.bathrooms, "2.5");
        assert_eq!(listing.sqft, Some(1800));
        assert_eq!(listing.mls_number.as_deref(), Some("MDGA2100000"));
        assert_eq!(
            listing.listing_url.as_deref(),
            Some("https://www.railey.com/listing/MDGA2100000")
        );
        assert!(listing.features.contains(&"lake-access".to_string()));
        assert!(listing.description.starts_with("A premium mountain property"));
        assert!(!listing.image_url.is_empty());
    }

    #[tokio::test]
    async fn caps_extraction_at_fifty_records() {
        let extractor = PatternExtractor::new().unwrap();
        let listings = extractor.extract(&page_with(80)).await.unwrap();
        assert_eq!(listings.len(), MAX_LISTINGS);
    }

    #[tokio::test]
    async fn associates_image_by_alt_text() {
        let extractor = PatternExtractor::new().unwrap();
        let page = format!(
            r#"<html><body>
<img alt="Front view of MDGA2100000" src="https://cdn.example.com/front.jpg">
{}
</body></html>"#,
            listing_block(0)
        );

        let listings = extractor.extract(&page).await.unwrap();
        assert_eq!(listings[0].image_url, "https://cdn.example.com/front.jpg");
    }

    #[tokio::test]
    async fn falls_back_to_placeholder_image() {
        let extractor = PatternExtractor::new().unwrap();
        let listings = extractor.extract(&page_with(1)).await.unwrap();
        // Lake-tagged address gets the lake category placeholder.
        assert!(listings[0].image_url.contains("unsplash"));
    }

    #[tokio::test]
    async fn skips_records_without_minimum_data() {
        let extractor = PatternExtractor::new().unwrap();
        let page = "<html><body><h3>MLS#: MDGA2109999</h3><p>No address here</p></body></html>";
        let listings = extractor.extract(page).await.unwrap();
        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn empty_page_yields_empty_sequence() {
        let extractor = PatternExtractor::new().unwrap();
        let listings = extractor.extract("<html><body></body></html>").await.unwrap();
        assert!(listings.is_empty());
    }
}
