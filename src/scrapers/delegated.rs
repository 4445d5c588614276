use std::time::Duration;

use anyhow::{Context, Result};
use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::ScrapeError;
use crate::models::RawListing;
use crate::normalize::coerce_price;
use crate::scrapers::enrich;
use crate::scrapers::traits::ListingExtractor;

/// Only this much of the page is sent to the extraction service.
const CONTENT_PREFIX_CAP: usize = 50_000;

const SYSTEM_PROMPT: &str = "You are a strict data extraction service for real-estate pages. \
Return only data literally present in the supplied content. Never invent listings, \
prices or addresses. Respond with a single JSON object and nothing else.";

/// Delegated extraction strategy: one chat completion per invocation, no
/// retries. A failure immediately falls through to the cache's stale or
/// fallback path.
pub struct LlmExtractor {
    client: Option<Client<OpenAIConfig>>,
    model: String,
}

/// Expected response schema. Anything else is rejected as malformed.
#[derive(Deserialize)]
struct ListingPayload {
    properties: Vec<ExtractedListing>,
}

#[derive(Deserialize)]
struct ExtractedListing {
    #[serde(default)]
    address: String,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    bedrooms: Value,
    #[serde(default)]
    bathrooms: Value,
    #[serde(default)]
    square_feet: Option<Value>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    mls_number: Option<String>,
    #[serde(default)]
    listing_url: Option<String>,
}

impl LlmExtractor {
    pub fn new(config: &Config) -> Result<Self> {
        let client = match &config.openai_api_key {
            Some(key) => {
                let http_client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(config.llm_timeout_secs))
                    .build()
                    .context("Failed to create LLM HTTP client")?;

                // Cap async-openai's internal retry backoff at our timeout;
                // its default keeps retrying 500s far longer than that.
                let backoff = backoff::ExponentialBackoff {
                    max_elapsed_time: Some(Duration::from_secs(config.llm_timeout_secs)),
                    ..Default::default()
                };

                Some(
                    Client::with_config(OpenAIConfig::new().with_api_key(key.clone()))
                        .with_http_client(http_client)
                        .with_backoff(backoff),
                )
            }
            None => None,
        };

        Ok(Self {
            client,
            model: config.llm_model.clone(),
        })
    }

    fn extraction_prompt(content: &str) -> String {
        let prefix = bounded_prefix(content, CONTENT_PREFIX_CAP);
        format!(
            "Extract every real-estate listing present in the page content below. \
Respond with a JSON object of the form {{\"properties\": [...]}} where each entry has: \
address (string), price (whole dollars), bedrooms (integer), bathrooms (string, \
fractional allowed), square_feet (integer or null), description (string), \
features (array of strings), mls_number (string or null), listing_url (string or null). \
Include only listings whose data appears literally in the content.\n\n\
PAGE CONTENT:\n{prefix}"
        )
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String, ScrapeError> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScrapeError::Malformed("response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if message.trim().is_empty() {
            return Err(ScrapeError::Malformed(
                "response contained empty content".to_string(),
            ));
        }

        Ok(message)
    }

    fn map_error(error: OpenAIError) -> ScrapeError {
        match &error {
            OpenAIError::Reqwest(reqwest_error) => match reqwest_error.status() {
                Some(reqwest::StatusCode::TOO_MANY_REQUESTS) => {
                    ScrapeError::Service("rate limit exceeded".to_string())
                }
                Some(reqwest::StatusCode::UNAUTHORIZED)
                | Some(reqwest::StatusCode::FORBIDDEN) => {
                    ScrapeError::Service(format!("authentication failed: {reqwest_error}"))
                }
                _ => ScrapeError::Network(format!("extraction request failed: {reqwest_error}")),
            },
            OpenAIError::ApiError(api_error) if is_quota_or_auth_error(api_error) => {
                ScrapeError::Service(format!("extraction service error: {api_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                ScrapeError::Network(format!("extraction API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                ScrapeError::Malformed(format!("unparseable API response: {err}"))
            }
            other => ScrapeError::Network(other.to_string()),
        }
    }
}

fn is_quota_or_auth_error(api_error: &ApiError) -> bool {
    let message = api_error.message.to_lowercase();
    let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
    let code = api_error.code.clone().unwrap_or_default().to_lowercase();

    message.contains("rate limit")
        || message.contains("too many requests")
        || message.contains("unauthorized")
        || message.contains("invalid api key")
        || error_type.contains("rate_limit")
        || error_type.contains("authentication")
        || code.contains("rate_limit")
        || code.contains("invalid_api_key")
        || code == "insufficient_quota"
}

/// Clamp to at most `cap` bytes without splitting a character.
fn bounded_prefix(content: &str, cap: usize) -> &str {
    if content.len() <= cap {
        return content;
    }
    let mut end = cap;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

/// LLM responses are often wrapped in markdown code fences; strip them
/// before JSON parsing.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn value_to_i64(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number.as_i64().unwrap_or(0),
        Value::String(text) => coerce_price(text),
        _ => 0,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => "0".to_string(),
    }
}

/// Parse the service response into listings. Any shape other than a
/// well-formed `{"properties": [...]}` object is rejected as malformed,
/// never a crash.
fn parse_listing_payload(content: &str) -> Result<Vec<RawListing>, ScrapeError> {
    let body = strip_code_fences(content);

    let payload: ListingPayload = serde_json::from_str(body).map_err(|err| {
        ScrapeError::Malformed(format!("response did not match listing schema: {err}"))
    })?;

    let listings = payload
        .properties
        .into_iter()
        .filter_map(|entry| {
            if entry.address.is_empty() {
                return None;
            }

            let price = value_to_i64(&entry.price);
            let sqft = entry
                .square_feet
                .as_ref()
                .map(value_to_i64)
                .filter(|value| *value > 0);

            let mut features = entry.features;
            enrich::apply_feature_tags(&mut features, &entry.address, sqft, price);

            let description = if entry.description.is_empty() {
                enrich::synthesize_description(price, &features)
            } else {
                entry.description
            };

            Some(RawListing {
                price,
                bedrooms: value_to_i64(&entry.bedrooms).max(0) as u32,
                bathrooms: value_to_string(&entry.bathrooms),
                sqft,
                description,
                image_url: enrich::placeholder_image(&features).to_string(),
                features,
                mls_number: entry.mls_number.filter(|mls| !mls.is_empty()),
                listing_url: entry.listing_url.filter(|url| !url.is_empty()),
                address: entry.address,
            })
        })
        .collect();

    Ok(listings)
}

#[async_trait]
impl ListingExtractor for LlmExtractor {
    async fn extract(&self, content: &str) -> Result<Vec<RawListing>, ScrapeError> {
        let client = self.client.as_ref().ok_or(ScrapeError::MissingApiKey)?;

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|err| ScrapeError::Malformed(format!("invalid system prompt: {err}")))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(Self::extraction_prompt(content))
                .build()
                .map_err(|err| ScrapeError::Malformed(format!("invalid user prompt: {err}")))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .temperature(0.0)
            .build()
            .map_err(|err| ScrapeError::Malformed(format!("invalid request: {err}")))?;

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(Self::map_error)?;

        let content = Self::extract_content(response)?;
        debug!(response_len = content.len(), "LLM extraction response received");

        parse_listing_payload(&content)
    }

    fn source_name(&self) -> &'static str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_payload_parses_into_listings() {
        let body = r#"{"properties": [{
            "address": "100 Deep Creek Dr, McHenry, MD",
            "price": "$450,000",
            "bedrooms": 3,
            "bathrooms": 2.5,
            "square_feet": 2100,
            "description": "",
            "features": ["hot-tub"],
            "mls_number": "MDGA2100100",
            "listing_url": "https://example.com/100"
        }]}"#;

        let listings = parse_listing_payload(body).unwrap();
        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.price, 450_000);
        assert_eq!(listing.bedrooms, 3);
        assert_eq!(listing.bathrooms, "2.5");
        assert_eq!(listing.sqft, Some(2100));
        assert!(listing.features.contains(&"hot-tub".to_string()));
        assert!(listing.features.contains(&"lake-access".to_string()));
        assert!(listing.description.starts_with("A premium"));
        assert!(!listing.image_url.is_empty());
    }

    #[test]
    fn malformed_payload_is_rejected_not_panicked() {
        let result = parse_listing_payload(r#"{"unexpected": true}"#);
        assert!(matches!(result, Err(ScrapeError::Malformed(_))));

        let result = parse_listing_payload("not json at all");
        assert!(matches!(result, Err(ScrapeError::Malformed(_))));
    }

    #[test]
    fn entries_without_address_are_ignored() {
        let body = r#"{"properties": [{"price": 100000}]}"#;
        let listings = parse_listing_payload(body).unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn code_fences_are_stripped() {
        let fenced = "```json\n{\"properties\": []}\n```";
        let listings = parse_listing_payload(fenced).unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn prefix_is_bounded_at_char_boundaries() {
        let content = "ä".repeat(40_000); // 80,000 bytes
        let prefix = bounded_prefix(&content, CONTENT_PREFIX_CAP);
        assert!(prefix.len() <= CONTENT_PREFIX_CAP);
        assert!(content.is_char_boundary(prefix.len()));

        let short = "short page";
        assert_eq!(bounded_prefix(short, CONTENT_PREFIX_CAP), short);
    }

    #[test]
    fn missing_api_key_fails_cleanly() {
        let config = Config {
            bind_addr: "0.0.0.0:0".to_string(),
            source_url: "https://example.com".to_string(),
            strategy: crate::config::ExtractionStrategy::Llm,
            openai_api_key: None,
            llm_model: "gpt-4o-mini".to_string(),
            llm_timeout_secs: 30,
        };

        let extractor = LlmExtractor::new(&config).unwrap();
        let result = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(extractor.extract("content"));
        assert!(matches!(result, Err(ScrapeError::MissingApiKey)));
    }

    #[test]
    fn numeric_coercion_is_lenient() {
        assert_eq!(value_to_i64(&Value::from(42)), 42);
        assert_eq!(value_to_i64(&Value::from("$1,200")), 1200);
        assert_eq!(value_to_i64(&Value::Null), 0);
        assert_eq!(value_to_string(&Value::from(2.5)), "2.5");
        assert_eq!(value_to_string(&Value::from("3")), "3");
        assert_eq!(value_to_string(&Value::Null), "0");
    }
}
