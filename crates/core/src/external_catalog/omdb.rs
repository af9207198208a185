//! OMDb (Open Movie Database) API client.
//!
//! OMDb requires an API key for access. A lookup by title returns at most
//! one movie; a miss comes back as HTTP 200 with `"Response": "False"`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::MovieMetadata;
use super::{ExternalCatalog, ExternalCatalogError};

const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";

/// OMDb API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OmdbConfig {
    /// OMDb API key (required).
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: http://www.omdbapi.com/).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig) -> Result<Self, ExternalCatalogError> {
        if config.api_key.is_empty() {
            return Err(ExternalCatalogError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl ExternalCatalog for OmdbClient {
    async fn find_movie(&self, title: &str) -> Result<MovieMetadata, ExternalCatalogError> {
        debug!("OMDb lookup: title='{}'", title);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(ExternalCatalogError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(ExternalCatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalCatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_response(&body, title)
    }
}

// ============================================================================
// OMDb API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

fn parse_response(body: &str, query: &str) -> Result<MovieMetadata, ExternalCatalogError> {
    let parsed: OmdbResponse = serde_json::from_str(body).map_err(|e| {
        ExternalCatalogError::ParseError(format!("Failed to parse OMDb response: {}", e))
    })?;

    if !parsed.response.eq_ignore_ascii_case("true") {
        let message = parsed.error.unwrap_or_default();
        debug!("OMDb miss for '{}': {}", query, message);
        if message.to_lowercase().contains("not found") || message.is_empty() {
            return Err(ExternalCatalogError::NotFound(query.to_string()));
        }
        return Err(ExternalCatalogError::ApiError {
            status: 200,
            message,
        });
    }

    let title = parsed
        .title
        .ok_or_else(|| ExternalCatalogError::ParseError("missing Title".to_string()))?;

    Ok(MovieMetadata {
        title,
        year: parsed.year.unwrap_or_default(),
        imdb_rating: parsed
            .imdb_rating
            .unwrap_or_else(|| super::NOT_AVAILABLE.to_string()),
        poster: parsed.poster,
        imdb_id: parsed.imdb_id,
    })
}
