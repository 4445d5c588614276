//! Static sample listings served when live extraction is unavailable.

use crate::models::RawListing;

/// Hand-authored regional listings with every field populated. Pure and
/// deterministic; the last line of defense behind the cache.
pub fn fallback_listings() -> Vec<RawListing> {
    vec![
        RawListing {
            address: "245 Lakefront Dr, McHenry, MD 21541".to_string(),
            price: 749_900,
            bedrooms: 4,
            bathrooms: "3.5".to_string(),
            sqft: Some(3200),
            description: "Stunning lakefront home with private dock and panoramic Deep Creek Lake views.".to_string(),
            features: vec![
                "lake-access".to_string(),
                "mountain-views".to_string(),
                "private-dock".to_string(),
            ],
            mls_number: Some("MDGA2101245".to_string()),
            listing_url: Some("https://www.railey.com/listing/MDGA2101245".to_string()),
            image_url: "https://images.unsplash.com/photo-1506744038136-46273834b3fb?w=800".to_string(),
        },
        RawListing {
            address: "1567 Wisp Mountain Rd, McHenry, MD 21541".to_string(),
            price: 529_000,
            bedrooms: 3,
            bathrooms: "2.5".to_string(),
            sqft: Some(2400),
            description: "Ski-in chalet minutes from the Wisp Resort lifts, sold furnished.".to_string(),
            features: vec![
                "ski-access".to_string(),
                "resort-area".to_string(),
                "furnished".to_string(),
            ],
            mls_number: Some("MDGA2101567".to_string()),
            listing_url: Some("https://www.railey.com/listing/MDGA2101567".to_string()),
            image_url: "https://images.unsplash.com/photo-1551524164-687a55dd1126?w=800".to_string(),
        },
        RawListing {
            address: "88 Marsh Hill Rd, Oakland, MD 21550".to_string(),
            price: 385_000,
            bedrooms: 3,
            bathrooms: "2".to_string(),
            sqft: Some(1850),
            description: "Updated rancher on a wooded acre near Garrett County trail heads.".to_string(),
            features: vec![
                "garrett-county".to_string(),
                "mountain-location".to_string(),
                "wooded-lot".to_string(),
            ],
            mls_number: Some("MDGA2100088".to_string()),
            listing_url: Some("https://www.railey.com/listing/MDGA2100088".to_string()),
            image_url: "https://images.unsplash.com/photo-1449844908441-8829872d2607?w=800".to_string(),
        },
        RawListing {
            address: "910 Glendale Rd, Swanton, MD 21561".to_string(),
            price: 899_500,
            bedrooms: 5,
            bathrooms: "4.5".to_string(),
            sqft: Some(4100),
            description: "Luxury timber-frame estate with lake access, stone fireplace and guest suite.".to_string(),
            features: vec![
                "lake-access".to_string(),
                "luxury-estate".to_string(),
                "premium".to_string(),
            ],
            mls_number: Some("MDGA2100910".to_string()),
            listing_url: Some("https://www.railey.com/listing/MDGA2100910".to_string()),
            image_url: "https://images.unsplash.com/photo-1600596542815-ffad4c1539a9?w=800".to_string(),
        },
        RawListing {
            address: "37 Sang Run Rd, Friendsville, MD 21531".to_string(),
            price: 264_900,
            bedrooms: 2,
            bathrooms: "1".to_string(),
            sqft: Some(1100),
            description: "Cozy cabin close to the Youghiogheny River, ideal starter or rental.".to_string(),
            features: vec![
                "mountain-location".to_string(),
                "natural-setting".to_string(),
            ],
            mls_number: Some("MDGA2100037".to_string()),
            listing_url: Some("https://www.railey.com/listing/MDGA2100037".to_string()),
            image_url: "https://images.unsplash.com/photo-1518780664697-55e3ad937233?w=800".to_string(),
        },
        RawListing {
            address: "422 Rock Lodge Rd, McHenry, MD 21541".to_string(),
            price: 615_000,
            bedrooms: 4,
            bathrooms: "3".to_string(),
            sqft: Some(2750),
            description: "Spacious lodge-style home with deck overlooking Deep Creek Lake cove.".to_string(),
            features: vec![
                "lake-access".to_string(),
                "spacious".to_string(),
                "premium".to_string(),
            ],
            mls_number: Some("MDGA2100422".to_string()),
            listing_url: Some("https://www.railey.com/listing/MDGA2100422".to_string()),
            image_url: "https://images.unsplash.com/photo-1506744038136-46273834b3fb?w=800".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_never_empty() {
        assert!(fallback_listings().len() >= 5);
    }

    #[test]
    fn fallback_entries_are_complete() {
        for listing in fallback_listings() {
            assert!(!listing.address.is_empty());
            assert!(listing.price > 0);
            assert!(!listing.bathrooms.is_empty());
            assert!(listing.sqft.is_some());
            assert!(!listing.description.is_empty());
            assert!(!listing.features.is_empty());
            assert!(listing.mls_number.is_some());
            assert!(listing.listing_url.is_some());
            assert!(!listing.image_url.is_empty());
        }
    }

    #[test]
    fn fallback_is_deterministic() {
        assert_eq!(fallback_listings(), fallback_listings());
    }
}
