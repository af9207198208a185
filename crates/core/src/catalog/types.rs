//! Types for the movie catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest rating the catalog accepts.
pub const MIN_RATING: f64 = 0.0;
/// Highest rating the catalog accepts.
pub const MAX_RATING: f64 = 10.0;

/// A movie stored in the catalog.
///
/// The title is the natural key: it is unique and case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Rating on a 0-10 scale.
    pub rating: f64,
    /// Poster URL (opaque, never validated).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Identifier in the external movie database (e.g. an IMDb id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Movie {
    /// Create a movie without poster or external id.
    pub fn new(title: impl Into<String>, year: i32, rating: f64) -> Self {
        Self {
            title: title.into(),
            year,
            rating,
            poster: None,
            external_id: None,
        }
    }

    /// Set the poster URL.
    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    /// Set the external identifier.
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

/// Read-only view of the whole catalog at one instant.
///
/// Movies keep the order in which they were read from the store
/// (insertion order). A snapshot is never mutated after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    movies: Vec<Movie>,
}

impl Snapshot {
    /// Wrap an ordered list of movies.
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Movie> {
        self.movies.iter()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Look up a movie by exact title.
    pub fn get(&self, title: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.title == title)
    }

    /// Check whether a movie with this exact title is present.
    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// All titles, in snapshot order.
    pub fn titles(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.title.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Movie;
    type IntoIter = std::slice::Iter<'a, Movie>;

    fn into_iter(self) -> Self::IntoIter {
        self.movies.iter()
    }
}

impl FromIterator<Movie> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Movie already exists: {0}")]
    AlreadyExists(String),

    #[error("Movie not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Reject empty or whitespace-only titles.
pub fn validate_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Reject ratings outside [MIN_RATING, MAX_RATING] and non-finite values.
pub fn validate_rating(rating: f64) -> Result<(), StoreError> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(StoreError::InvalidInput(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }
    Ok(())
}
