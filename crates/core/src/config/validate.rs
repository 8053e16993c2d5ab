use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Static prefix is not the URL root (it would shadow the query routes)
/// - Extension filters are non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Library validation
    if config.library.static_prefix.trim().trim_matches('/').is_empty() {
        return Err(ConfigError::ValidationError(
            "library.static_prefix cannot be empty or '/'".to_string(),
        ));
    }

    if config
        .library
        .extensions
        .iter()
        .any(|ext| ext.trim().trim_start_matches('.').is_empty())
    {
        return Err(ConfigError::ValidationError(
            "library.extensions cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}
