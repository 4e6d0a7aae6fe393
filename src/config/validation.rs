use crate::config::types::{Config, FetchConfig, OutputConfig, SearchConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_search_config(&config.search)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.read_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "read_timeout_secs must be > 0 when set".to_string(),
        ));
    }

    if config.connect_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be > 0 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates search terms
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if let Some(pos) = config.terms.iter().position(|t| t.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "search term {} is blank",
            pos + 1
        )));
    }

    Ok(())
}
