use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Database path is not empty
/// - Search threshold is within 0-100 and at least one candidate is allowed
/// - OMDb timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.database.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.path cannot be empty".to_string(),
        ));
    }

    // Search validation
    let threshold = config.search.threshold;
    if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
        return Err(ConfigError::ValidationError(format!(
            "search.threshold must be between 0 and 100, got {}",
            threshold
        )));
    }
    if config.search.max_candidates == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_candidates cannot be 0".to_string(),
        ));
    }

    if let Some(omdb) = &config.omdb {
        if omdb.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "omdb.timeout_secs cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}
