//! Event service implementation
//!
//! Organizer-scoped event management. Local writes are committed first; the
//! calendar mirror runs afterwards and its failures are reported through
//! [`SyncStatus`] without touching the stored event.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::database::store::{EventStore, RegistrationStore};
use crate::models::event::{CreateEventRequest, Event, EventInput};
use crate::models::user::Principal;
use crate::services::google::{generate_add_to_calendar_url, generate_ical, CalendarSync};
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::logging::{log_calendar_sync, log_event_action};

/// What happened to the calendar mirror during a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    NotRequested,
    /// Sync was requested but no calendar is configured
    Disabled,
    Synced { calendar_event_id: String },
    Failed { reason: String },
}

impl SyncStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, SyncStatus::Failed { .. })
    }
}

/// A stored event together with the outcome of mirroring it
#[derive(Debug, Clone, Serialize)]
pub struct EventOutcome {
    pub event: Event,
    pub sync: SyncStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    pub event: Event,
    /// True when the viewer has a registration row of any status
    pub is_registered: bool,
    pub add_to_calendar_url: String,
}

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventStore>,
    registrations: Arc<dyn RegistrationStore>,
    calendar: Option<Arc<dyn CalendarSync>>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventStore>,
        registrations: Arc<dyn RegistrationStore>,
        calendar: Option<Arc<dyn CalendarSync>>,
    ) -> Self {
        Self {
            events,
            registrations,
            calendar,
        }
    }

    pub fn calendar_enabled(&self) -> bool {
        self.calendar.is_some()
    }

    /// Validate and persist a new event organized by `principal`
    pub async fn create_event(&self, principal: &Principal, input: EventInput) -> Result<EventOutcome> {
        let fields = input.validate()?;

        let event = self
            .events
            .create(CreateEventRequest {
                fields,
                organizer_id: principal.user_id,
            })
            .await?;

        log_event_action(event.id, "create", principal.user_id, Some(&event.title));

        if !input.sync_to_calendar {
            return Ok(EventOutcome {
                event,
                sync: SyncStatus::NotRequested,
            });
        }

        self.mirror_new(event).await
    }

    /// Overwrite an event the principal organizes
    pub async fn update_event(&self, id: i64, principal: &Principal, input: EventInput) -> Result<EventOutcome> {
        let fields = input.validate()?;

        let event = match self.events.update_for_organizer(id, principal.user_id, fields).await? {
            Some(event) => event,
            None => return Err(self.classify_miss(id, principal, "edit").await),
        };

        log_event_action(event.id, "update", principal.user_id, None);

        if !input.sync_to_calendar {
            return Ok(EventOutcome {
                event,
                sync: SyncStatus::NotRequested,
            });
        }

        if !event.is_synced() {
            return self.mirror_new(event).await;
        }

        let Some(calendar) = &self.calendar else {
            return Ok(EventOutcome {
                event,
                sync: SyncStatus::Disabled,
            });
        };

        let calendar_event_id = event.calendar_event_id.clone().unwrap_or_default();
        let sync = match calendar.update_remote_event(&event).await {
            Ok(()) => {
                log_calendar_sync(event.id, "update", Some(&calendar_event_id), None);
                SyncStatus::Synced { calendar_event_id }
            }
            Err(e) => {
                let reason = e.to_string();
                log_calendar_sync(event.id, "update", Some(&calendar_event_id), Some(&reason));
                SyncStatus::Failed { reason }
            }
        };

        Ok(EventOutcome { event, sync })
    }

    /// Delete an event the principal organizes, then drop its calendar mirror
    pub async fn delete_event(&self, id: i64, principal: &Principal) -> Result<EventOutcome> {
        let event = match self.events.find_for_organizer(id, principal.user_id).await? {
            Some(event) => event,
            None => return Err(self.classify_miss(id, principal, "delete").await),
        };

        if !self.events.delete_for_organizer(id, principal.user_id).await? {
            // Removed by a concurrent delete.
            return Err(CampusEventsError::EventNotFound { event_id: id });
        }

        log_event_action(event.id, "delete", principal.user_id, Some(&event.title));

        let Some(calendar_event_id) = event.calendar_event_id.clone() else {
            return Ok(EventOutcome {
                event,
                sync: SyncStatus::NotRequested,
            });
        };

        let Some(calendar) = &self.calendar else {
            debug!(event_id = event.id, "Calendar not configured, leaving remote entry in place");
            return Ok(EventOutcome {
                event,
                sync: SyncStatus::Disabled,
            });
        };

        let sync = match calendar.delete_remote_event(&event).await {
            Ok(()) => {
                log_calendar_sync(event.id, "delete", Some(&calendar_event_id), None);
                SyncStatus::Synced { calendar_event_id }
            }
            Err(e) => {
                let reason = e.to_string();
                log_calendar_sync(event.id, "delete", Some(&calendar_event_id), Some(&reason));
                SyncStatus::Failed { reason }
            }
        };

        Ok(EventOutcome { event, sync })
    }

    /// All events by (date, time)
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        self.events.list().await
    }

    pub async fn get_event(&self, id: i64) -> Result<Event> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or(CampusEventsError::EventNotFound { event_id: id })
    }

    pub async fn get_event_detail(&self, id: i64, principal: &Principal) -> Result<EventDetail> {
        let event = self.get_event(id).await?;
        let is_registered = self
            .registrations
            .find(principal.user_id, id)
            .await?
            .is_some();
        let add_to_calendar_url = generate_add_to_calendar_url(&event);

        Ok(EventDetail {
            event,
            is_registered,
            add_to_calendar_url,
        })
    }

    /// Single-event iCalendar document
    pub async fn export_ics(&self, id: i64) -> Result<String> {
        let event = self.get_event(id).await?;
        Ok(generate_ical(&event))
    }

    /// Create the remote entry for an event that has none and record its id
    async fn mirror_new(&self, event: Event) -> Result<EventOutcome> {
        let Some(calendar) = &self.calendar else {
            debug!(event_id = event.id, "Calendar sync requested but not configured");
            return Ok(EventOutcome {
                event,
                sync: SyncStatus::Disabled,
            });
        };

        match calendar.create_remote_event(&event).await {
            Ok(calendar_event_id) => {
                let event = self
                    .events
                    .set_calendar_event_id(event.id, Some(calendar_event_id.clone()))
                    .await?;
                log_calendar_sync(event.id, "create", Some(&calendar_event_id), None);

                Ok(EventOutcome {
                    event,
                    sync: SyncStatus::Synced { calendar_event_id },
                })
            }
            Err(e) => {
                let reason = e.to_string();
                log_calendar_sync(event.id, "create", None, Some(&reason));

                Ok(EventOutcome {
                    event,
                    sync: SyncStatus::Failed { reason },
                })
            }
        }
    }

    /// Decide why an organizer-scoped query matched nothing
    async fn classify_miss(&self, id: i64, principal: &Principal, action: &str) -> CampusEventsError {
        match self.events.find_by_id(id).await {
            Ok(Some(event)) => {
                warn!(
                    event_id = id,
                    user_id = principal.user_id,
                    organizer_id = event.organizer_id,
                    action = action,
                    "Non-organizer attempted to modify event"
                );
                CampusEventsError::PermissionDenied(format!(
                    "You are not allowed to {} this event.",
                    action
                ))
            }
            Ok(None) => CampusEventsError::EventNotFound { event_id: id },
            Err(e) => e,
        }
    }
}
