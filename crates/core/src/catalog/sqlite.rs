//! SQLite-backed movie catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use super::{validate_rating, validate_title, Movie, MovieStore, Snapshot, StoreError};

/// SQLite-backed movie catalog.
///
/// Owns its connection; the connection is closed when the store is
/// dropped or explicitly via [`SqliteMovieStore::close`].
pub struct SqliteMovieStore {
    conn: Mutex<Connection>,
}

impl SqliteMovieStore {
    /// Open (or create) a catalog database at `path`, creating the table if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::StorageUnavailable(format!(
                        "cannot create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path).map_err(storage_error)?;
        Self::initialize_schema(&conn)?;
        debug!("Opened movie catalog at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Close the underlying connection, reporting any error from SQLite.
    pub fn close(self) -> Result<(), StoreError> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| StoreError::StorageUnavailable("connection lock poisoned".to_string()))?;
        conn.close().map_err(|(_, e)| storage_error(e))
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT UNIQUE NOT NULL,
                year INTEGER NOT NULL,
                rating REAL NOT NULL,
                poster TEXT,
                external_id TEXT
            );
            "#,
        )
        .map_err(storage_error)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::StorageUnavailable("connection lock poisoned".to_string()))
    }

    fn row_to_movie(row: &rusqlite::Row) -> rusqlite::Result<Movie> {
        Ok(Movie {
            title: row.get(0)?,
            year: row.get(1)?,
            rating: row.get(2)?,
            poster: row.get(3)?,
            external_id: row.get(4)?,
        })
    }
}

fn storage_error(e: rusqlite::Error) -> StoreError {
    StoreError::StorageUnavailable(e.to_string())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl MovieStore for SqliteMovieStore {
    fn list_all(&self) -> Result<Snapshot, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare("SELECT title, year, rating, poster, external_id FROM movies ORDER BY id")
            .map_err(storage_error)?;

        let movies = stmt
            .query_map([], Self::row_to_movie)
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        debug!("Listed {} movies", movies.len());
        Ok(Snapshot::new(movies))
    }

    fn get(&self, title: &str) -> Result<Movie, StoreError> {
        let conn = self.lock()?;

        conn.query_row(
            "SELECT title, year, rating, poster, external_id FROM movies WHERE title = ?",
            params![title],
            Self::row_to_movie,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(title.to_string()),
            _ => storage_error(e),
        })
    }

    fn count(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .map_err(storage_error)?;
        Ok(count as u64)
    }

    fn add(&self, movie: &Movie) -> Result<(), StoreError> {
        validate_title(&movie.title)?;
        validate_rating(movie.rating)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(storage_error)?;

        // Dropping `tx` without commit rolls back.
        match tx.execute(
            "INSERT INTO movies (title, year, rating, poster, external_id)
             VALUES (?, ?, ?, ?, ?)",
            params![
                &movie.title,
                movie.year,
                movie.rating,
                &movie.poster,
                &movie.external_id,
            ],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                warn!("Rejected duplicate movie '{}'", movie.title);
                return Err(StoreError::AlreadyExists(movie.title.clone()));
            }
            Err(e) => return Err(storage_error(e)),
        }

        tx.commit().map_err(storage_error)?;
        info!("Added movie '{}' ({})", movie.title, movie.year);
        Ok(())
    }

    fn delete(&self, title: &str) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(storage_error)?;

        let rows_affected = tx
            .execute("DELETE FROM movies WHERE title = ?", params![title])
            .map_err(storage_error)?;

        if rows_affected == 0 {
            warn!("Cannot delete '{}': not in catalog", title);
            return Err(StoreError::NotFound(title.to_string()));
        }

        tx.commit().map_err(storage_error)?;
        info!("Deleted movie '{}'", title);
        Ok(())
    }

    fn update_rating(&self, title: &str, rating: f64) -> Result<(), StoreError> {
        validate_rating(rating)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(storage_error)?;

        let rows_affected = tx
            .execute(
                "UPDATE movies SET rating = ? WHERE title = ?",
                params![rating, title],
            )
            .map_err(storage_error)?;

        if rows_affected == 0 {
            warn!("Cannot update '{}': not in catalog", title);
            return Err(StoreError::NotFound(title.to_string()));
        }

        tx.commit().map_err(storage_error)?;
        info!("Updated rating of '{}' to {}", title, rating);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteMovieStore {
        SqliteMovieStore::in_memory().unwrap()
    }

    fn create_test_movie(title: &str) -> Movie {
        Movie::new(title, 2010, 8.8)
            .with_poster(format!("https://img.example/{}.jpg", title.to_lowercase()))
            .with_external_id("tt1375666")
    }

    #[test]
    fn test_add_new_movie() {
        let store = create_test_store();
        store.add(&create_test_movie("Inception")).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        assert!(store.list_all().unwrap().contains("Inception"));
    }

    #[test]
    fn test_add_round_trip() {
        let store = create_test_store();
        let movie = create_test_movie("Inception");
        store.add(&movie).unwrap();

        let snapshot = store.list_all().unwrap();
        assert_eq!(snapshot.get("Inception"), Some(&movie));
    }

    #[test]
    fn test_add_without_optional_fields() {
        let store = create_test_store();
        store.add(&Movie::new("Primer", 2004, 6.9)).unwrap();

        let movie = store.get("Primer").unwrap();
        assert!(movie.poster.is_none());
        assert!(movie.external_id.is_none());
    }

    #[test]
    fn test_add_duplicate_rejected_and_unchanged() {
        let store = create_test_store();
        let original = create_test_movie("Inception");
        store.add(&original).unwrap();

        let mut duplicate = Movie::new("Inception", 1999, 1.0);
        duplicate.poster = Some("https://other/poster.jpg".to_string());
        let result = store.add(&duplicate);
        assert!(matches!(result, Err(StoreError::AlreadyExists(ref t)) if t == "Inception"));

        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get("Inception").unwrap(), original);
    }

    #[test]
    fn test_titles_are_case_sensitive() {
        let store = create_test_store();
        store.add(&Movie::new("Heat", 1995, 8.3)).unwrap();
        store.add(&Movie::new("heat", 1986, 4.4)).unwrap();

        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let store = create_test_store();

        let result = store.add(&Movie::new("  ", 2000, 5.0));
        assert!(matches!(result, Err(StoreError::InvalidInput(_))));

        let result = store.add(&Movie::new("Too Good", 2000, 11.0));
        assert!(matches!(result, Err(StoreError::InvalidInput(_))));

        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let store = create_test_store();
        for title in ["Zodiac", "Alien", "Memento"] {
            store.add(&Movie::new(title, 2000, 7.0)).unwrap();
        }

        let snapshot = store.list_all().unwrap();
        assert_eq!(snapshot.titles(), vec!["Zodiac", "Alien", "Memento"]);
    }

    #[test]
    fn test_list_empty() {
        let store = create_test_store();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let store = create_test_store();
        store.add(&create_test_movie("Inception")).unwrap();

        store.delete("Inception").unwrap();

        assert!(!store.list_all().unwrap().contains("Inception"));
    }

    #[test]
    fn test_delete_twice_reports_not_found() {
        let store = create_test_store();
        store.add(&create_test_movie("Inception")).unwrap();

        store.delete("Inception").unwrap();
        let result = store.delete("Inception");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_nonexistent() {
        let store = create_test_store();
        let result = store.delete("Nope");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_update_rating_changes_only_rating() {
        let store = create_test_store();
        let original = create_test_movie("Inception");
        store.add(&original).unwrap();

        store.update_rating("Inception", 9.1).unwrap();

        let updated = store.get("Inception").unwrap();
        assert_eq!(updated.rating, 9.1);
        assert_eq!(updated.year, original.year);
        assert_eq!(updated.poster, original.poster);
        assert_eq!(updated.external_id, original.external_id);
    }

    #[test]
    fn test_update_rating_nonexistent() {
        let store = create_test_store();
        let result = store.update_rating("Nope", 5.0);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_update_rating_out_of_range() {
        let store = create_test_store();
        store.add(&create_test_movie("Inception")).unwrap();

        let result = store.update_rating("Inception", -1.0);
        assert!(matches!(result, Err(StoreError::InvalidInput(_))));
        assert_eq!(store.get("Inception").unwrap().rating, 8.8);
    }

    #[test]
    fn test_get_nonexistent() {
        let store = create_test_store();
        let result = store.get("Nope");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_poisoned_lock_is_storage_unavailable() {
        let store = std::sync::Arc::new(create_test_store());
        store.add(&create_test_movie("Inception")).unwrap();

        let shared = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = shared.conn.lock().unwrap();
            panic!("writer died holding the connection");
        })
        .join();

        assert!(matches!(
            store.list_all(),
            Err(StoreError::StorageUnavailable(_))
        ));
        assert!(matches!(
            store.add(&create_test_movie("Heat")),
            Err(StoreError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn test_close() {
        let store = create_test_store();
        store.add(&create_test_movie("Inception")).unwrap();
        assert!(store.close().is_ok());
    }
}
