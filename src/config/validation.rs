//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use std::path::Path;

use super::Settings;
use crate::utils::errors::{CampusEventsError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;

    match (&settings.google, settings.features.calendar_sync) {
        (Some(google_config), _) => validate_google_config(google_config)?,
        (None, true) => {
            return Err(CampusEventsError::Config(
                "Calendar sync is enabled but the [google] section is missing".to_string(),
            ))
        }
        (None, false) => {}
    }

    Ok(())
}

/// Validate HTTP listener configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(CampusEventsError::Config("Server host is required".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CampusEventsError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(CampusEventsError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CampusEventsError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate bearer token settings
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(CampusEventsError::Config(
            "Auth JWT secret is required".to_string()
        ));
    }

    Ok(())
}

/// Validate Google Calendar configuration
fn validate_google_config(config: &super::GoogleConfig) -> Result<()> {
    if config.service_account_path.is_empty() {
        return Err(CampusEventsError::Config(
            "Google service account path is required".to_string()
        ));
    }

    if !Path::new(&config.service_account_path).is_file() {
        return Err(CampusEventsError::Config(format!(
            "Google service account file not found: {}",
            config.service_account_path
        )));
    }

    if config.calendar_id.is_empty() {
        return Err(CampusEventsError::Config(
            "Google calendar ID is required".to_string()
        ));
    }

    url::Url::parse(&config.api_base_url).map_err(|e| {
        CampusEventsError::Config(format!(
            "Invalid Google API base URL {}: {}",
            config.api_base_url, e
        ))
    })?;

    if config.request_timeout_seconds == 0 {
        return Err(CampusEventsError::Config(
            "Google request timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampusEventsError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CampusEventsError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if config.directory.is_empty() {
        return Err(CampusEventsError::Config(
            "Log directory is required".to_string()
        ));
    }

    Ok(())
}
