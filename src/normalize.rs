//! Mapping from raw listing records to canonical properties.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Property, RawListing};
use crate::scrapers::enrich;

/// Total mapping into the canonical model: never fails for a structurally
/// valid [`RawListing`]. The id is the source MLS number when present,
/// otherwise a fresh UUID.
pub fn normalize(raw: RawListing) -> Property {
    let id = raw
        .mls_number
        .clone()
        .filter(|mls| !mls.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let title = enrich::synthesize_title(&raw.address, &raw.features);

    let image_url = if raw.image_url.is_empty() {
        enrich::placeholder_image(&raw.features).to_string()
    } else {
        raw.image_url
    };

    Property {
        id,
        title,
        address: raw.address,
        price: raw.price.max(0),
        bedrooms: raw.bedrooms,
        bathrooms: raw.bathrooms,
        image_url,
        description: Some(raw.description).filter(|text| !text.is_empty()),
        features: Some(raw.features).filter(|tags| !tags.is_empty()),
        created_at: Utc::now(),
    }
}

/// Coerce a price string like "$325,000" into whole dollars.
///
/// Strips everything except digits and the decimal point, then keeps the
/// integer part. Anything unparseable coerces to 0 rather than erroring.
pub fn coerce_price(text: &str) -> i64 {
    let cleaned: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();

    cleaned
        .split('.')
        .next()
        .unwrap_or("")
        .parse()
        .unwrap_or(0)
}
