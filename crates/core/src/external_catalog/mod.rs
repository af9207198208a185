//! External catalog integration for movie metadata.
//!
//! Adding a movie starts with a lookup here: the user types a title and the
//! external catalog supplies the canonical title, year, rating, poster and id.

mod omdb;
mod types;

pub use omdb::{OmdbClient, OmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with external catalogs.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// No movie matched the query.
    #[error("Movie not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for external movie metadata catalogs.
#[async_trait]
pub trait ExternalCatalog: Send + Sync {
    /// Look up a movie by free-text title.
    async fn find_movie(&self, title: &str) -> Result<MovieMetadata, ExternalCatalogError>;
}
