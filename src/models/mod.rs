use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing record as produced by an extraction strategy, before normalization.
///
/// Optional fields may be missing in live data; integration code must
/// tolerate the gaps. Bathrooms stay a string because fractional counts
/// like "2.5" are common in source listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub address: String,
    /// Whole dollars, no minor units.
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: String,
    pub sqft: Option<i64>,
    pub description: String,
    pub features: Vec<String>,
    pub mls_number: Option<String>,
    pub listing_url: Option<String>,
    pub image_url: String,
}

/// Canonical property record served over the API.
///
/// Invariants: `image_url` is never empty and `price` is never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub address: String,
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: String,
    pub image_url: String,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}
