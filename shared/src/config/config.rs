use std::fs;
use tracing::{debug, info};

use crate::types::server_config::{AppConfig, ConfigError};

/// Read, parse, and validate the TOML config file.
///
/// Called exactly once at startup; there is no reload path. Any validation
/// failure aborts the process before a socket is bound.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(format!(
            "config file {} is empty",
            path
        )));
    }

    let config: AppConfig = toml::from_str(&contents)?;
    debug!("Parsed config: {:?}", config);

    validate_config(&config)?;
    info!("Configuration validated");

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.bind.is_empty() {
        return Err(ConfigError::InvalidConfig("bind cannot be empty".into()));
    }

    if config.database.url.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "database.url cannot be empty".into(),
        ));
    }

    if config.auth.token_expiry_minutes == 0 {
        return Err(ConfigError::InvalidConfig(
            "token_expiry_minutes must be greater than 0".into(),
        ));
    }

    if config.server.max_connections == 0 {
        return Err(ConfigError::InvalidConfig(
            "max_connections must be greater than 0".into(),
        ));
    }

    // The signing secret must be resolvable (env var or config field) and
    // long enough. Rejected here so a misconfigured deployment dies at
    // startup instead of silently signing tokens with a weak default.
    match config.auth.resolved_jwt_secret() {
        None => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be set via the JWT_SECRET env var or auth.jwt_secret config field"
                    .into(),
            ));
        }
        Some(secret) if secret.len() < 32 => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be at least 32 characters long".into(),
            ));
        }
        _ => {}
    }

    Ok(())
}
