use std::env;

/// Which extraction strategy to run behind the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Fixed structural patterns over the page text.
    Pattern,
    /// Delegated extraction through an LLM.
    Llm,
}

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub source_url: String,
    pub strategy: ExtractionStrategy,
    /// Missing key makes the LLM strategy fail cleanly at call time.
    pub openai_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let strategy = match env::var("EXTRACTION_STRATEGY").ok().as_deref() {
            Some("llm") => ExtractionStrategy::Llm,
            _ => ExtractionStrategy::Pattern,
        };

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            source_url: env::var("LISTING_SOURCE_URL").unwrap_or_else(|_| {
                "https://www.railey.com/deep-creek-lake-real-estate/".to_string()
            }),
            strategy,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            llm_timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(30),
        }
    }
}
