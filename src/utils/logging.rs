//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the Campus Events service.

use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::{CampusEventsError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer when dropped; keep it alive for the
/// lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.directory, "campus-events.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
        .try_init()
        .map_err(|e| CampusEventsError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log event management actions
pub fn log_event_action(event_id: i64, action: &str, user_id: i64, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        details = details,
        "Event action performed"
    );
}

/// Log registration lifecycle transitions
pub fn log_registration_action(event_id: i64, user_id: i64, action: &str, outcome: &str) {
    info!(
        event_id = event_id,
        user_id = user_id,
        action = action,
        outcome = outcome,
        "Registration action performed"
    );
}

/// Log the result of a calendar mirror call
pub fn log_calendar_sync(event_id: i64, operation: &str, calendar_event_id: Option<&str>, failure: Option<&str>) {
    match failure {
        None => info!(
            event_id = event_id,
            operation = operation,
            calendar_event_id = calendar_event_id,
            "Calendar sync succeeded"
        ),
        Some(reason) => warn!(
            event_id = event_id,
            operation = operation,
            calendar_event_id = calendar_event_id,
            reason = reason,
            "Calendar sync failed, local state kept"
        ),
    }
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}
