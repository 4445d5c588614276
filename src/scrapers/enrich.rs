//! Derived-field rules shared by both extraction strategies.
//!
//! Whatever a strategy pulls out of the page, these rules fill in the
//! marketing-facing fields: feature tags keyed off location tokens and
//! size/price thresholds, a synthesized title, a one-sentence description,
//! and a category placeholder image when no real photo was found.

const DEFAULT_TAGS: [&str; 2] = ["mountain-location", "natural-setting"];

const LAKE_IMAGE: &str = "https://images.unsplash.com/photo-1506744038136-46273834b3fb?w=800";
const SKI_IMAGE: &str = "https://images.unsplash.com/photo-1551524164-687a55dd1126?w=800";
const ESTATE_IMAGE: &str = "https://images.unsplash.com/photo-1600596542815-ffad4c1539a9?w=800";
const DEFAULT_IMAGE: &str = "https://images.unsplash.com/photo-1449844908441-8829872d2607?w=800";

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|existing| existing == tag) {
        tags.push(tag.to_string());
    }
}

/// Extend `features` with tags derived from the address, square footage
/// and price. Falls back to a fixed default set when nothing matched and
/// the strategy supplied no tags of its own.
pub fn apply_feature_tags(features: &mut Vec<String>, address: &str, sqft: Option<i64>, price: i64) {
    let addr = address.to_lowercase();

    if addr.contains("lake") || addr.contains("deep creek") {
        push_unique(features, "lake-access");
        push_unique(features, "mountain-views");
    }
    if addr.contains("wisp") || addr.contains("ski") {
        push_unique(features, "ski-access");
        push_unique(features, "resort-area");
    }
    if addr.contains("garrett") {
        push_unique(features, "garrett-county");
        push_unique(features, "mountain-location");
    }

    if let Some(sqft) = sqft {
        if sqft > 2500 {
            push_unique(features, "spacious");
            push_unique(features, "large-home");
        }
        if sqft > 3500 {
            push_unique(features, "luxury");
        }
    }

    if price > 500_000 {
        push_unique(features, "premium");
        push_unique(features, "high-end");
    }
    if price > 750_000 {
        push_unique(features, "luxury-estate");
    }

    if features.is_empty() {
        for tag in DEFAULT_TAGS {
            features.push(tag.to_string());
        }
    }
}

fn has_tag(features: &[String], tag: &str) -> bool {
    features.iter().any(|feature| feature == tag)
}

/// Display title for a listing. The street portion is the address text
/// before the first comma.
pub fn synthesize_title(address: &str, features: &[String]) -> String {
    let street = address.split(',').next().unwrap_or(address).trim();

    if has_tag(features, "lake-access") {
        format!("Lake Access Home – {street}")
    } else if has_tag(features, "ski-access") {
        format!("Ski Resort Property – {street}")
    } else if has_tag(features, "luxury-estate") {
        format!("Luxury Mountain Estate – {street}")
    } else {
        format!("Mountain Home – {street}")
    }
}

/// Templated one-liner built from a price-tier adjective and up to the
/// first three feature tags.
pub fn synthesize_description(price: i64, features: &[String]) -> String {
    let adjective = if price > 500_000 {
        "luxury"
    } else if price > 300_000 {
        "premium"
    } else {
        "comfortable"
    };

    let highlights = features
        .iter()
        .take(3)
        .map(|tag| tag.to_lowercase())
        .collect::<Vec<_>>()
        .join(", ");

    format!("A {adjective} mountain property featuring {highlights}.")
}

/// Category placeholder used when no listing photo could be associated.
pub fn placeholder_image(features: &[String]) -> &'static str {
    if has_tag(features, "lake-access") {
        LAKE_IMAGE
    } else if has_tag(features, "ski-access") {
        SKI_IMAGE
    } else if has_tag(features, "luxury-estate") {
        ESTATE_IMAGE
    } else {
        DEFAULT_IMAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lake_tokens_tag_lake_access() {
        let mut tags = Vec::new();
        apply_feature_tags(&mut tags, "100 Deep Creek Dr, McHenry, MD", None, 250_000);
        assert!(tags.contains(&"lake-access".to_string()));
        assert!(tags.contains(&"mountain-views".to_string()));
    }

    #[test]
    fn ski_and_county_tokens_tag_accordingly() {
        let mut tags = Vec::new();
        apply_feature_tags(&mut tags, "12 Wisp Resort Rd, Garrett County, MD", None, 250_000);
        assert!(tags.contains(&"ski-access".to_string()));
        assert!(tags.contains(&"resort-area".to_string()));
        assert!(tags.contains(&"garrett-county".to_string()));
        assert!(tags.contains(&"mountain-location".to_string()));
    }

    #[test]
    fn size_and_price_thresholds_add_tiers() {
        let mut tags = Vec::new();
        apply_feature_tags(&mut tags, "1 Main St, Oakland, MD", Some(3600), 800_000);
        for tag in ["spacious", "large-home", "luxury", "premium", "high-end", "luxury-estate"] {
            assert!(tags.contains(&tag.to_string()), "missing {tag}");
        }
    }

    #[test]
    fn thresholds_are_exclusive_bounds() {
        let mut tags = Vec::new();
        apply_feature_tags(&mut tags, "1 Main St, Oakland, MD", Some(2500), 500_000);
        assert_eq!(tags, vec!["mountain-location", "natural-setting"]);
    }

    #[test]
    fn unmatched_address_gets_default_tags() {
        let mut tags = Vec::new();
        apply_feature_tags(&mut tags, "42 Elm St, Grantsville, MD", None, 0);
        assert_eq!(tags, vec!["mountain-location", "natural-setting"]);
    }

    #[test]
    fn existing_tags_are_kept_and_not_duplicated() {
        let mut tags = vec!["hot-tub".to_string(), "lake-access".to_string()];
        apply_feature_tags(&mut tags, "100 Lake Shore Dr, McHenry, MD", None, 0);
        assert_eq!(
            tags.iter().filter(|tag| *tag == "lake-access").count(),
            1
        );
        assert!(tags.contains(&"hot-tub".to_string()));
    }

    #[test]
    fn title_priority_lake_over_ski() {
        let features = vec!["ski-access".to_string(), "lake-access".to_string()];
        let title = synthesize_title("100 Deep Creek Dr, McHenry, MD", &features);
        assert_eq!(title, "Lake Access Home – 100 Deep Creek Dr");
    }

    #[test]
    fn title_falls_back_to_generic() {
        let title = synthesize_title("42 Elm St, Grantsville, MD", &[]);
        assert_eq!(title, "Mountain Home – 42 Elm St");
    }

    #[test]
    fn title_without_comma_uses_whole_address() {
        let title = synthesize_title("42 Elm St", &[]);
        assert_eq!(title, "Mountain Home – 42 Elm St");
    }

    #[test]
    fn description_combines_tier_and_tags() {
        let features = vec![
            "lake-access".to_string(),
            "mountain-views".to_string(),
            "premium".to_string(),
            "extra".to_string(),
        ];
        let description = synthesize_description(650_000, &features);
        assert_eq!(
            description,
            "A luxury mountain property featuring lake-access, mountain-views, premium."
        );
    }

    #[test]
    fn description_tiers() {
        assert!(synthesize_description(250_000, &[]).starts_with("A comfortable"));
        assert!(synthesize_description(350_000, &[]).starts_with("A premium"));
        assert!(synthesize_description(550_000, &[]).starts_with("A luxury"));
    }

    #[test]
    fn placeholder_image_follows_tag_category() {
        assert_eq!(placeholder_image(&["lake-access".to_string()]), LAKE_IMAGE);
        assert_eq!(placeholder_image(&["ski-access".to_string()]), SKI_IMAGE);
        assert_eq!(
            placeholder_image(&["luxury-estate".to_string()]),
            ESTATE_IMAGE
        );
        assert_eq!(placeholder_image(&[]), DEFAULT_IMAGE);
    }
}
