//! Types for external catalog API responses.

use serde::{Deserialize, Serialize};

use super::ExternalCatalogError;
use crate::catalog::Movie;

/// Value OMDb uses for missing fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Movie metadata as returned by an external catalog.
///
/// Fields are kept as the raw strings the catalog sends; conversion into a
/// catalog [`Movie`] happens in [`MovieMetadata::to_movie`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    /// Canonical title.
    pub title: String,
    /// Release year, possibly a range such as "2010–2012".
    pub year: String,
    /// IMDb rating, or "N/A".
    pub imdb_rating: String,
    /// Poster URL, or "N/A".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// IMDb identifier (e.g. "tt1375666").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
}

impl MovieMetadata {
    /// Numeric rating, or `None` when the catalog has no rating.
    pub fn rating(&self) -> Option<f64> {
        self.imdb_rating
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
    }

    /// Release year from the leading four digits of the year field.
    pub fn release_year(&self) -> Option<i32> {
        let digits: String = self
            .year
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();

        if digits.len() < 4 {
            return None;
        }
        digits[..4].parse().ok()
    }

    /// Convert into a catalog movie.
    ///
    /// A missing or non-numeric rating becomes 0.0. "N/A" posters and ids
    /// become absent.
    pub fn to_movie(&self) -> Result<Movie, ExternalCatalogError> {
        let year = self.release_year().ok_or_else(|| {
            ExternalCatalogError::ParseError(format!(
                "no release year in '{}' for '{}'",
                self.year, self.title
            ))
        })?;

        Ok(Movie {
            title: self.title.clone(),
            year,
            rating: self.rating().unwrap_or(0.0),
            poster: available(self.poster.as_deref()),
            external_id: available(self.imdb_id.as_deref()),
        })
    }
}

fn available(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(year: &str, rating: &str) -> MovieMetadata {
        MovieMetadata {
            title: "Inception".to_string(),
            year: year.to_string(),
            imdb_rating: rating.to_string(),
            poster: Some("https://m.media-amazon.com/inception.jpg".to_string()),
            imdb_id: Some("tt1375666".to_string()),
        }
    }

    #[test]
    fn test_to_movie() {
        let movie = metadata("2010", "8.8").to_movie().unwrap();
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.year, 2010);
        assert_eq!(movie.rating, 8.8);
        assert_eq!(
            movie.poster.as_deref(),
            Some("https://m.media-amazon.com/inception.jpg")
        );
        assert_eq!(movie.external_id.as_deref(), Some("tt1375666"));
    }

    #[test]
    fn test_rating_not_available_becomes_zero() {
        let meta = metadata("2010", "N/A");
        assert_eq!(meta.rating(), None);
        assert_eq!(meta.to_movie().unwrap().rating, 0.0);
    }

    #[test]
    fn test_year_range_uses_first_year() {
        let movie = metadata("2010–2012", "7.0").to_movie().unwrap();
        assert_eq!(movie.year, 2010);
    }

    #[test]
    fn test_missing_year_fails() {
        let result = metadata("N/A", "7.0").to_movie();
        assert!(matches!(result, Err(ExternalCatalogError::ParseError(_))));
    }

    #[test]
    fn test_not_available_poster_is_absent() {
        let mut meta = metadata("2010", "8.8");
        meta.poster = Some("N/A".to_string());
        meta.imdb_id = None;

        let movie = meta.to_movie().unwrap();
        assert!(movie.poster.is_none());
        assert!(movie.external_id.is_none());
    }
}
