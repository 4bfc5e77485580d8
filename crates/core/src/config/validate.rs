use super::{types::Config, ConfigError};

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.browse.per_page == 0 {
        return Err(ConfigError::ValidationError(
            "browse.per_page must be greater than 0".to_string(),
        ));
    }

    if config.browse.max_search_results == 0 {
        return Err(ConfigError::ValidationError(
            "browse.max_search_results must be greater than 0".to_string(),
        ));
    }

    if config.comments.per_page == 0 {
        return Err(ConfigError::ValidationError(
            "comments.per_page must be greater than 0".to_string(),
        ));
    }

    if config.browse.use_search_index {
        match &config.search_index {
            Some(index) if !index.url.is_empty() => {}
            _ => {
                return Err(ConfigError::ValidationError(
                    "browse.use_search_index requires a [search_index] section with a url"
                        .to_string(),
                ))
            }
        }
    }

    Ok(())
}
