//! Testing utilities and mock implementations.
//!
//! The catalog itself needs no mock: [`crate::catalog::SqliteMovieStore::in_memory`]
//! gives every test its own throwaway database. Only the network-facing
//! metadata lookup is replaced here.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelshelf_core::testing::{fixtures, MockExternalCatalog};
//!
//! let catalog = MockExternalCatalog::new();
//! catalog.add_movie(fixtures::metadata("Inception", "2010", "8.8")).await;
//!
//! let found = catalog.find_movie("inception").await?;
//! assert_eq!(found.title, "Inception");
//! ```

mod mock_external_catalog;

pub use mock_external_catalog::MockExternalCatalog;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Movie, Snapshot};
    use crate::external_catalog::MovieMetadata;

    /// Create a catalog movie without poster or external id.
    pub fn movie(title: &str, year: i32, rating: f64) -> Movie {
        Movie::new(title, year, rating)
    }

    /// Create a snapshot from `(title, year, rating)` triples, in order.
    pub fn snapshot(entries: &[(&str, i32, f64)]) -> Snapshot {
        entries
            .iter()
            .map(|(title, year, rating)| movie(title, *year, *rating))
            .collect()
    }

    /// Create external metadata as the catalog service would return it.
    pub fn metadata(title: &str, year: &str, imdb_rating: &str) -> MovieMetadata {
        let slug: String = title
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        MovieMetadata {
            title: title.to_string(),
            year: year.to_string(),
            imdb_rating: imdb_rating.to_string(),
            poster: Some(format!("https://posters.example/{}.jpg", slug)),
            imdb_id: Some(format!("tt{:07}", slug.len() * 7919 % 10_000_000)),
        }
    }
}
