//! Mock external catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external_catalog::{ExternalCatalog, ExternalCatalogError, MovieMetadata};

/// Mock implementation of the ExternalCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configured metadata, looked up by case-insensitive title
/// - Track queries for assertions
/// - Simulate failures
#[derive(Debug)]
pub struct MockExternalCatalog {
    /// Metadata keyed by lowercased title.
    movies: Arc<RwLock<HashMap<String, MovieMetadata>>>,
    /// Recorded title queries.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<ExternalCatalogError>>>,
}

impl Default for MockExternalCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExternalCatalog {
    /// Create a new empty mock external catalog.
    pub fn new() -> Self {
        Self {
            movies: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Add movie metadata.
    pub async fn add_movie(&self, metadata: MovieMetadata) {
        self.movies
            .write()
            .await
            .insert(metadata.title.to_lowercase(), metadata);
    }

    /// Clear all movies.
    pub async fn clear_movies(&self) {
        self.movies.write().await.clear();
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: ExternalCatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    async fn take_error(&self) -> Option<ExternalCatalogError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl ExternalCatalog for MockExternalCatalog {
    async fn find_movie(&self, title: &str) -> Result<MovieMetadata, ExternalCatalogError> {
        self.queries.write().await.push(title.to_string());

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.movies
            .read()
            .await
            .get(&title.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| ExternalCatalogError::NotFound(title.to_string()))
    }
}
