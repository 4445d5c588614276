use thiserror::Error;

/// Failures of the listing acquisition pipeline.
///
/// All variants except `Service` are absorbed at the cache boundary and
/// degrade to stale-cache-then-fallback data. `Service` is additionally
/// surfaced on the manual re-scrape endpoint as a structured response.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("listing source fetch failed: {0}")]
    Network(String),

    #[error("extraction produced no listings")]
    Empty,

    #[error("extraction service returned a malformed response: {0}")]
    Malformed(String),

    #[error("extraction service rejected the request: {0}")]
    Service(String),

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::Network(err.to_string())
    }
}
