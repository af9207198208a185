pub mod catalog;
pub mod config;
pub mod external_catalog;
pub mod search;
pub mod stats;
pub mod testing;

pub use catalog::{Movie, MovieStore, Snapshot, SqliteMovieStore, StoreError};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use external_catalog::{
    ExternalCatalog, ExternalCatalogError, MovieMetadata, OmdbClient, OmdbConfig,
};
pub use search::{Candidate, FuzzyMatcher, MatchOutcome, MatcherConfig};
pub use stats::{MovieFilter, RatingStats, SortOrder, StatsError};
