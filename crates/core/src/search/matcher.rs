//! Fuzzy title matcher.
//!
//! Resolves a partial or misspelled query against the titles of a catalog
//! snapshot. Works entirely offline and keeps no state between calls.

use serde::Serialize;
use tracing::debug;

use super::scorer::{same_title, weighted_ratio};
use crate::catalog::Snapshot;

/// Configuration for the fuzzy matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Minimum score (0-100) a candidate needs to be reported.
    pub threshold: f64,
    /// Maximum number of candidates considered.
    pub max_candidates: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 60.0,
            max_candidates: 5,
        }
    }
}

/// A title with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub title: String,
    pub score: f64,
}

/// Outcome of resolving a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "titles", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// One surviving candidate equals the query (ignoring case).
    Definitive(String),
    /// Ranked "did you mean" suggestions, best first.
    Suggestions(Vec<String>),
    /// Nothing scored above the threshold.
    NoMatch,
}

/// Heuristic title matcher.
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    config: MatcherConfig,
}

impl FuzzyMatcher {
    /// Create a matcher with default config (threshold 60, 5 candidates).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with custom config.
    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Score every title, best first, cut to `max_candidates`, then drop
    /// anything under the threshold.
    ///
    /// Equal scores keep the input order of `titles`.
    pub fn rank<I, S>(&self, query: &str, titles: I) -> Vec<Candidate>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut candidates: Vec<Candidate> = titles
            .into_iter()
            .map(|title| {
                let title = title.as_ref();
                Candidate {
                    title: title.to_string(),
                    score: weighted_ratio(query, title),
                }
            })
            .collect();

        // sort_by is stable
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(self.config.max_candidates);
        candidates.retain(|c| c.score >= self.config.threshold);

        debug!(
            "Query '{}' ranked {} candidate(s) above {}",
            query,
            candidates.len(),
            self.config.threshold
        );
        candidates
    }

    /// Resolve a query into a definitive title, suggestions, or nothing.
    pub fn resolve<I, S>(&self, query: &str, titles: I) -> MatchOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let query = query.trim();
        if query.is_empty() {
            return MatchOutcome::NoMatch;
        }

        let candidates = self.rank(query, titles);
        if candidates.is_empty() {
            return MatchOutcome::NoMatch;
        }

        if let Some(exact) = candidates.iter().find(|c| same_title(&c.title, query)) {
            return MatchOutcome::Definitive(exact.title.clone());
        }

        MatchOutcome::Suggestions(candidates.into_iter().map(|c| c.title).collect())
    }

    /// Resolve a query against the titles of a snapshot.
    pub fn resolve_in(&self, query: &str, snapshot: &Snapshot) -> MatchOutcome {
        self.resolve(query, snapshot.titles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Movie;

    #[test]
    fn test_exact_match_short_circuits() {
        let matcher = FuzzyMatcher::new();
        let outcome = matcher.resolve("Inception", ["Inception", "Interception"]);
        assert_eq!(outcome, MatchOutcome::Definitive("Inception".to_string()));
    }

    #[test]
    fn test_exact_match_ignores_case() {
        let matcher = FuzzyMatcher::new();
        let outcome = matcher.resolve("inception", ["Interception", "Inception"]);
        assert_eq!(outcome, MatchOutcome::Definitive("Inception".to_string()));
    }

    #[test]
    fn test_punctuation_only_title_is_definitive() {
        let matcher = FuzzyMatcher::new();
        let outcome = matcher.resolve("?", ["?", "Heat"]);
        assert_eq!(outcome, MatchOutcome::Definitive("?".to_string()));
    }

    #[test]
    fn test_exact_match_uses_full_case_fold() {
        let matcher = FuzzyMatcher::new();
        let outcome = matcher.resolve("STRASSE", ["Straße", "Heat"]);
        assert_eq!(outcome, MatchOutcome::Definitive("Straße".to_string()));
    }

    #[test]
    fn test_misspelled_query_gives_ranked_suggestions() {
        let matcher = FuzzyMatcher::new();
        let outcome = matcher.resolve("Str Wras", ["Star Wars", "Star Trek", "Avatar"]);
        assert_eq!(
            outcome,
            MatchOutcome::Suggestions(vec!["Star Wars".to_string(), "Star Trek".to_string()])
        );
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let matcher = FuzzyMatcher::new();
        let titles = ["Star Wars", "Star Trek", "Avatar"];
        let first = matcher.rank("Str Wras", titles);
        for _ in 0..10 {
            assert_eq!(matcher.rank("Str Wras", titles), first);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = FuzzyMatcher::new();
        let ranked = matcher.rank("alien", ["Alien Two", "Alien One"]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[0].title, "Alien Two");
        assert_eq!(ranked[1].title, "Alien One");

        let ranked = matcher.rank("alien", ["Alien One", "Alien Two"]);
        assert_eq!(ranked[0].title, "Alien One");
    }

    #[test]
    fn test_no_match_below_threshold() {
        let matcher = FuzzyMatcher::new();
        let outcome = matcher.resolve("zzzzzz", ["Star Wars", "Avatar"]);
        assert_eq!(outcome, MatchOutcome::NoMatch);
    }

    #[test]
    fn test_empty_query_is_no_match() {
        let matcher = FuzzyMatcher::new();
        assert_eq!(matcher.resolve("   ", ["Avatar"]), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_empty_titles_is_no_match() {
        let matcher = FuzzyMatcher::new();
        let titles: Vec<String> = Vec::new();
        assert_eq!(matcher.resolve("Avatar", titles), MatchOutcome::NoMatch);
    }

    #[test]
    fn test_truncates_before_threshold() {
        let matcher = FuzzyMatcher::with_config(MatcherConfig {
            threshold: 0.0,
            max_candidates: 2,
        });
        let ranked = matcher.rank("alien", ["Alien", "Aliens", "Alien 3", "Heat"]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].title, "Alien");
    }

    #[test]
    fn test_single_candidate_limit_keeps_best_match() {
        let matcher = FuzzyMatcher::with_config(MatcherConfig {
            threshold: 0.0,
            max_candidates: 1,
        });
        let outcome = matcher.resolve("alien", ["Aliens", "Alien"]);
        assert_eq!(outcome, MatchOutcome::Definitive("Alien".to_string()));
    }

    #[test]
    fn test_resolve_in_snapshot() {
        let matcher = FuzzyMatcher::new();
        let snapshot = Snapshot::new(vec![
            Movie::new("The Matrix", 1999, 8.7),
            Movie::new("Heat", 1995, 8.3),
        ]);
        let outcome = matcher.resolve_in("matrix", &snapshot);
        assert_eq!(
            outcome,
            MatchOutcome::Suggestions(vec!["The Matrix".to_string()])
        );
    }
}
