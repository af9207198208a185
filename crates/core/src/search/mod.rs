//! Fuzzy title search over a catalog snapshot.

mod matcher;
pub mod scorer;

pub use matcher::{Candidate, FuzzyMatcher, MatchOutcome, MatcherConfig};
pub use scorer::weighted_ratio;
