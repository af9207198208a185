//! Movie catalog - the durable set of movies, keyed by title.
//!
//! Every mutation runs inside a single transaction, so a reader only ever
//! sees the catalog before or after a change, never halfway through it.

mod sqlite;
mod types;

pub use sqlite::SqliteMovieStore;
pub use types::*;

/// Trait for movie catalog storage.
pub trait MovieStore: Send + Sync {
    /// Read the whole catalog as one consistent snapshot.
    fn list_all(&self) -> Result<Snapshot, StoreError>;

    /// Get a single movie by exact title.
    fn get(&self, title: &str) -> Result<Movie, StoreError>;

    /// Number of movies in the catalog.
    fn count(&self) -> Result<u64, StoreError>;

    /// Add a new movie.
    ///
    /// Fails with `AlreadyExists` if the title is taken. The uniqueness
    /// constraint of the backing store decides, not a prior lookup.
    fn add(&self, movie: &Movie) -> Result<(), StoreError>;

    /// Delete a movie by title. Fails with `NotFound` if absent.
    fn delete(&self, title: &str) -> Result<(), StoreError>;

    /// Replace the rating of a movie. Other fields are left untouched.
    fn update_rating(&self, title: &str, rating: f64) -> Result<(), StoreError>;
}
