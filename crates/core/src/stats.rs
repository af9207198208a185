//! Read-only derivations over a catalog snapshot: rating statistics,
//! sorted and filtered views, and random picks.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Movie, Snapshot};

/// Errors for statistics over a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("The catalog is empty")]
    EmptyCatalog,
}

/// Rating statistics over the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingStats {
    /// Population mean of all ratings.
    pub mean: f64,
    /// Median of all ratings (mean of the two middle values for even counts).
    pub median: f64,
    /// Highest rating.
    pub best_rating: f64,
    /// Every title sharing the highest rating, in snapshot order.
    pub best: Vec<String>,
    /// Lowest rating.
    pub worst_rating: f64,
    /// Every title sharing the lowest rating, in snapshot order.
    pub worst: Vec<String>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Inclusive bounds for [`filter_movies`]. `None` means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieFilter {
    pub min_rating: Option<f64>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        self.min_rating.is_none_or(|min| movie.rating >= min)
            && self.start_year.is_none_or(|start| movie.year >= start)
            && self.end_year.is_none_or(|end| movie.year <= end)
    }
}

/// Compute mean, median, best and worst over all ratings.
pub fn rating_stats(snapshot: &Snapshot) -> Result<RatingStats, StatsError> {
    if snapshot.is_empty() {
        return Err(StatsError::EmptyCatalog);
    }

    let mut ratings: Vec<f64> = snapshot.iter().map(|m| m.rating).collect();
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;

    ratings.sort_by(f64::total_cmp);
    let mid = ratings.len() / 2;
    let median = if ratings.len() % 2 == 0 {
        (ratings[mid - 1] + ratings[mid]) / 2.0
    } else {
        ratings[mid]
    };

    let worst_rating = ratings[0];
    let best_rating = ratings[ratings.len() - 1];

    let titles_rated = |rating: f64| -> Vec<String> {
        snapshot
            .iter()
            .filter(|m| m.rating == rating)
            .map(|m| m.title.clone())
            .collect()
    };

    Ok(RatingStats {
        mean,
        median,
        best_rating,
        best: titles_rated(best_rating),
        worst_rating,
        worst: titles_rated(worst_rating),
    })
}

/// Movies sorted by rating. Ties keep snapshot order.
pub fn sorted_by_rating(snapshot: &Snapshot, order: SortOrder) -> Vec<Movie> {
    let mut movies = snapshot.movies().to_vec();
    match order {
        SortOrder::Ascending => movies.sort_by(|a, b| a.rating.total_cmp(&b.rating)),
        SortOrder::Descending => movies.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
    movies
}

/// Movies sorted by release year. Ties keep snapshot order.
pub fn sorted_by_year(snapshot: &Snapshot, order: SortOrder) -> Vec<Movie> {
    let mut movies = snapshot.movies().to_vec();
    match order {
        SortOrder::Ascending => movies.sort_by_key(|m| m.year),
        SortOrder::Descending => movies.sort_by(|a, b| b.year.cmp(&a.year)),
    }
    movies
}

/// Movies matching the filter, in snapshot order.
pub fn filter_movies(snapshot: &Snapshot, filter: &MovieFilter) -> Vec<Movie> {
    snapshot
        .iter()
        .filter(|m| filter.matches(m))
        .cloned()
        .collect()
}

/// Pick one movie uniformly at random using the given generator.
pub fn random_movie_with<'a, R: Rng + ?Sized>(
    snapshot: &'a Snapshot,
    rng: &mut R,
) -> Result<&'a Movie, StatsError> {
    snapshot
        .movies()
        .choose(rng)
        .ok_or(StatsError::EmptyCatalog)
}

/// Pick one movie uniformly at random.
pub fn random_movie(snapshot: &Snapshot) -> Result<&Movie, StatsError> {
    random_movie_with(snapshot, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snapshot(entries: &[(&str, i32, f64)]) -> Snapshot {
        entries
            .iter()
            .map(|(title, year, rating)| Movie::new(*title, *year, *rating))
            .collect()
    }

    fn titles(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn test_stats_reports_all_ties() {
        let snap = snapshot(&[("A", 2000, 8.0), ("B", 2001, 8.0), ("C", 2002, 3.0)]);
        let stats = rating_stats(&snap).unwrap();

        assert!((stats.mean - 19.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.median, 8.0);
        assert_eq!(stats.best, vec!["A", "B"]);
        assert_eq!(stats.best_rating, 8.0);
        assert_eq!(stats.worst, vec!["C"]);
        assert_eq!(stats.worst_rating, 3.0);
    }

    #[test]
    fn test_stats_even_count_median() {
        let snap = snapshot(&[("A", 2000, 2.0), ("B", 2000, 9.0), ("C", 2000, 4.0), ("D", 2000, 7.0)]);
        let stats = rating_stats(&snap).unwrap();
        assert_eq!(stats.median, 5.5);
        assert_eq!(stats.mean, 5.5);
    }

    #[test]
    fn test_stats_single_movie_is_best_and_worst() {
        let snap = snapshot(&[("Solo", 2018, 6.9)]);
        let stats = rating_stats(&snap).unwrap();
        assert_eq!(stats.best, vec!["Solo"]);
        assert_eq!(stats.worst, vec!["Solo"]);
        assert_eq!(stats.median, 6.9);
    }

    #[test]
    fn test_stats_empty_catalog() {
        assert_eq!(rating_stats(&Snapshot::default()), Err(StatsError::EmptyCatalog));
    }

    #[test]
    fn test_random_empty_catalog() {
        assert_eq!(random_movie(&Snapshot::default()), Err(StatsError::EmptyCatalog));
    }

    #[test]
    fn test_random_picks_from_snapshot() {
        let snap = snapshot(&[("A", 2000, 1.0), ("B", 2001, 2.0), ("C", 2002, 3.0)]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let movie = random_movie_with(&snap, &mut rng).unwrap();
            assert!(snap.contains(&movie.title));
        }
        assert!(random_movie(&snap).is_ok());
    }

    #[test]
    fn test_random_covers_all_entries() {
        let snap = snapshot(&[("A", 2000, 1.0), ("B", 2001, 2.0)]);
        let mut rng = StdRng::seed_from_u64(42);
        let picked: std::collections::HashSet<String> = (0..200)
            .map(|_| random_movie_with(&snap, &mut rng).unwrap().title.clone())
            .collect();
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_sorted_by_rating_descending_is_stable() {
        let snap = snapshot(&[("A", 2000, 7.0), ("B", 2001, 9.0), ("C", 2002, 7.0)]);
        let sorted = sorted_by_rating(&snap, SortOrder::Descending);
        assert_eq!(titles(&sorted), vec!["B", "A", "C"]);

        let sorted = sorted_by_rating(&snap, SortOrder::Ascending);
        assert_eq!(titles(&sorted), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_sorted_by_year_both_directions() {
        let snap = snapshot(&[("A", 2005, 1.0), ("B", 1999, 2.0), ("C", 2005, 3.0)]);
        assert_eq!(
            titles(&sorted_by_year(&snap, SortOrder::Ascending)),
            vec!["B", "A", "C"]
        );
        assert_eq!(
            titles(&sorted_by_year(&snap, SortOrder::Descending)),
            vec!["A", "C", "B"]
        );
    }

    #[test]
    fn test_filter_bounds_are_inclusive() {
        let snap = snapshot(&[
            ("Edge", 2000, 7.0),
            ("Low", 2005, 6.9),
            ("Late", 2011, 9.0),
            ("End", 2010, 8.0),
        ]);
        let filter = MovieFilter {
            min_rating: Some(7.0),
            start_year: Some(2000),
            end_year: Some(2010),
        };
        assert_eq!(titles(&filter_movies(&snap, &filter)), vec!["Edge", "End"]);
    }

    #[test]
    fn test_filter_without_bounds_keeps_everything_in_order() {
        let snap = snapshot(&[("Z", 1990, 1.0), ("A", 2020, 9.0)]);
        assert_eq!(
            titles(&filter_movies(&snap, &MovieFilter::default())),
            vec!["Z", "A"]
        );
    }

    #[test]
    fn test_filter_single_bound() {
        let snap = snapshot(&[("Old", 1950, 8.0), ("New", 2020, 5.0)]);
        let filter = MovieFilter {
            end_year: Some(1999),
            ..Default::default()
        };
        assert_eq!(titles(&filter_movies(&snap, &filter)), vec!["Old"]);
    }
}
