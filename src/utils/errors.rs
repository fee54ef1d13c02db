//! Error handling for Campus Events
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use serde::Serialize;
use thiserror::Error;

/// Main error type for the Campus Events application
#[derive(Error, Debug)]
pub enum CampusEventsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Calendar sync error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Registration not found for user {user_id} and event {event_id}")]
    RegistrationNotFound { user_id: i64, event_id: i64 },

    #[error("Conflicting concurrent update: {0}")]
    Conflict(String),

    #[error("Invalid stored value: {0}")]
    InvalidData(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),
}

/// Google Calendar API specific errors
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Calendar credentials unavailable: {0}")]
    Credentials(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Google Calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Google Calendar request failed: {0}")]
    Transport(String),

    #[error("Invalid Google Calendar response: {0}")]
    InvalidResponse(String),
}

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Structured set of field validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if at least one failure was recorded for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Result type alias for Campus Events operations
pub type Result<T> = std::result::Result<T, CampusEventsError>;

/// Result type alias for Google Calendar operations
pub type CalendarResult<T> = std::result::Result<T, CalendarError>;

impl From<reqwest::Error> for CalendarError {
    fn from(err: reqwest::Error) -> Self {
        CalendarError::Transport(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for CalendarError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        CalendarError::Credentials(format!("cannot sign service account assertion: {}", err))
    }
}

impl CampusEventsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CampusEventsError::Database(_) => ErrorSeverity::Critical,
            CampusEventsError::Migration(_) => ErrorSeverity::Critical,
            CampusEventsError::Config(_) => ErrorSeverity::Critical,
            CampusEventsError::InvalidData(_) => ErrorSeverity::Critical,
            CampusEventsError::PermissionDenied(_) => ErrorSeverity::Warning,
            CampusEventsError::Authentication(_) => ErrorSeverity::Warning,
            CampusEventsError::EventNotFound { .. } => ErrorSeverity::Warning,
            CampusEventsError::RegistrationNotFound { .. } => ErrorSeverity::Warning,
            CampusEventsError::Conflict(_) => ErrorSeverity::Warning,
            CampusEventsError::Validation(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collect_fields() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("title", "This field is required.");
        errors.add("location", "Ensure this value has at most 200 characters.");

        assert!(errors.has_field("title"));
        assert!(!errors.has_field("date"));
        assert_eq!(
            errors.to_string(),
            "title: This field is required.; location: Ensure this value has at most 200 characters."
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(
            CampusEventsError::Config("missing".to_string()).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            CampusEventsError::EventNotFound { event_id: 1 }.severity(),
            ErrorSeverity::Warning
        );
        assert_eq!(
            CampusEventsError::Validation(ValidationErrors::new()).severity(),
            ErrorSeverity::Info
        );
        assert_eq!(
            CampusEventsError::Calendar(CalendarError::Transport("timeout".into())).severity(),
            ErrorSeverity::Error
        );
    }
}
