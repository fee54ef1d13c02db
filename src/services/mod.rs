//! Services module
//!
//! This module contains business logic services

pub mod calendar_view;
pub mod events;
pub mod google;
pub mod registration;
pub mod user;

// Re-export commonly used services
pub use calendar_view::build_month_view;
pub use events::{EventDetail, EventOutcome, EventService, SyncStatus};
pub use google::{CalendarSync, GoogleCalendarEvent, GoogleCalendarService};
pub use registration::{MyEvents, RegistrationChange, RegistrationService};
pub use user::UserService;

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub event_service: EventService,
    pub registration_service: RegistrationService,
}

impl ServiceFactory {
    /// Build every service over `database`, with the calendar adapter when sync is enabled
    pub fn new(settings: &Settings, database: &DatabaseService) -> Result<Self> {
        let calendar: Option<Arc<dyn CalendarSync>> = match (&settings.google, settings.calendar_sync_enabled()) {
            (Some(google), true) => Some(Arc::new(GoogleCalendarService::new(google.clone())?)),
            _ => None,
        };

        Ok(Self::with_calendar(settings, database, calendar))
    }

    /// Build every service with an explicit calendar adapter
    pub fn with_calendar(
        settings: &Settings,
        database: &DatabaseService,
        calendar: Option<Arc<dyn CalendarSync>>,
    ) -> Self {
        Self {
            user_service: UserService::new(database.users.clone()),
            event_service: EventService::new(
                database.events.clone(),
                database.registrations.clone(),
                calendar,
            ),
            registration_service: RegistrationService::new(
                database.events.clone(),
                database.registrations.clone(),
                settings.features.month_view_excludes_canceled,
            ),
        }
    }
}
