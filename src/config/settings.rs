//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Default Google Calendar v3 REST endpoint
pub const DEFAULT_GOOGLE_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub google: Option<GoogleConfig>,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Bearer token verification for tokens issued by the identity provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: Option<String>,
}

/// Google Calendar configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleConfig {
    pub service_account_path: String,
    pub calendar_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
}

/// Feature flags configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeaturesConfig {
    #[serde(default)]
    pub calendar_sync: bool,
    /// Hide canceled registrations from the monthly calendar grid
    #[serde(default)]
    pub month_view_excludes_canceled: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_GOOGLE_API_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::from_file("config")
    }

    /// Load settings from the named file (extension optional) overlaid by the environment
    pub fn from_file(name: &str) -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();

        let settings = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections as i64)?
            .set_default("database.min_connections", defaults.database.min_connections as i64)?
            .set_default("auth.jwt_secret", defaults.auth.jwt_secret)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.directory", defaults.logging.directory)?
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("CAMPUS_EVENTS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::CampusEventsError> {
        super::validation::validate_settings(self)
    }

    /// Whether the Google Calendar adapter should be constructed
    pub fn calendar_sync_enabled(&self) -> bool {
        self.features.calendar_sync && self.google.is_some()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/campus_db".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                issuer: None,
            },
            google: None,
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
            },
            features: FeaturesConfig::default(),
        }
    }
}
