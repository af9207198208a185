use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::external_catalog::OmdbConfig;
use crate::search::MatcherConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub omdb: Option<OmdbConfig>,
    #[serde(default)]
    pub website: WebsiteConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("movies.db")
}

/// Fuzzy search configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SearchConfig {
    /// Minimum score (0-100) for a title to be suggested
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Maximum number of suggestions
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_threshold() -> f64 {
    60.0
}

fn default_max_candidates() -> usize {
    5
}

impl From<&SearchConfig> for MatcherConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            threshold: config.threshold,
            max_candidates: config.max_candidates,
        }
    }
}

/// Static website generation
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WebsiteConfig {
    /// HTML template with __TEMPLATE_TITLE__ and __TEMPLATE_MOVIE_GRID__ placeholders
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    /// Where the generated page is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Page title
    #[serde(default = "default_site_title")]
    pub title: String,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            output_path: default_output_path(),
            title: default_site_title(),
        }
    }
}

fn default_template_path() -> PathBuf {
    PathBuf::from("static/index_template.html")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("static/generated-website.html")
}

fn default_site_title() -> String {
    "My Movie App".to_string()
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub database: DatabaseConfig,
    pub search: SearchConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omdb: Option<SanitizedOmdbConfig>,
    pub website: WebsiteConfig,
}

/// Sanitized OMDb config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedOmdbConfig {
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            database: config.database.clone(),
            search: config.search.clone(),
            omdb: config.omdb.as_ref().map(|o| SanitizedOmdbConfig {
                base_url: o.base_url.clone(),
                api_key_configured: !o.api_key.is_empty(),
                timeout_secs: o.timeout_secs,
            }),
            website: config.website.clone(),
        }
    }
}
