//! Registration lifecycle service
//!
//! Per (user, event) the state is one of unregistered, registered or canceled.
//! At most one row exists per pair; registering never revives a canceled row.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::database::store::{EventStore, RegistrationStore};
use crate::models::calendar::MonthView;
use crate::models::event::Event;
use crate::models::registration::{RegisteredEvent, Registration, RegistrationStatus};
use crate::models::user::Principal;
use crate::services::calendar_view::build_month_view;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::logging::log_registration_action;

pub const NOT_REGISTERED_MESSAGE: &str = "You are not registered for this event.";

/// Insert attempts before a register racing repeated unregisters gives up
const REGISTER_ATTEMPTS: usize = 3;

/// Result of a lifecycle transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationChange {
    Registered { registration: Registration, title: String },
    AlreadyRegistered { registration: Registration },
    Canceled { registration: Registration, title: String },
    Unregistered { title: String },
}

impl RegistrationChange {
    /// User-facing notice for the transition
    pub fn message(&self) -> String {
        match self {
            RegistrationChange::Registered { title, .. } => format!("You have registered for {}.", title),
            RegistrationChange::AlreadyRegistered { .. } => "You are already registered for this event.".to_string(),
            RegistrationChange::Canceled { title, .. } => {
                format!("You have canceled your registration for {}.", title)
            }
            RegistrationChange::Unregistered { title } => {
                format!("You have successfully unregistered from {}.", title)
            }
        }
    }

    pub fn registration(&self) -> Option<&Registration> {
        match self {
            RegistrationChange::Registered { registration, .. }
            | RegistrationChange::AlreadyRegistered { registration }
            | RegistrationChange::Canceled { registration, .. } => Some(registration),
            RegistrationChange::Unregistered { .. } => None,
        }
    }
}

/// The "my events" page: every registration plus this month's calendar grid
#[derive(Debug, Clone, Serialize)]
pub struct MyEvents {
    pub registrations: Vec<RegisteredEvent>,
    pub calendar: MonthView,
}

#[derive(Clone)]
pub struct RegistrationService {
    events: Arc<dyn EventStore>,
    registrations: Arc<dyn RegistrationStore>,
    exclude_canceled_from_month_view: bool,
}

impl RegistrationService {
    pub fn new(
        events: Arc<dyn EventStore>,
        registrations: Arc<dyn RegistrationStore>,
        exclude_canceled_from_month_view: bool,
    ) -> Self {
        Self {
            events,
            registrations,
            exclude_canceled_from_month_view,
        }
    }

    async fn event(&self, event_id: i64) -> Result<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(CampusEventsError::EventNotFound { event_id })
    }

    /// Register the principal for an event, or report the existing row
    pub async fn register(&self, principal: &Principal, event_id: i64) -> Result<RegistrationChange> {
        let event = self.event(event_id).await?;

        let (registration, created) = self.insert_if_absent(principal, event_id).await?;

        if created {
            log_registration_action(event_id, principal.user_id, "register", "registered");
            Ok(RegistrationChange::Registered {
                registration,
                title: event.title,
            })
        } else {
            log_registration_action(event_id, principal.user_id, "register", "already_registered");
            Ok(RegistrationChange::AlreadyRegistered { registration })
        }
    }

    /// Mark the principal's registration canceled; repeating it is harmless
    pub async fn cancel(&self, principal: &Principal, event_id: i64) -> Result<RegistrationChange> {
        let event = self.event(event_id).await?;

        let registration = self
            .registrations
            .set_status(principal.user_id, event_id, RegistrationStatus::Canceled)
            .await?
            .ok_or_else(|| self.not_registered(principal, event_id, "cancel"))?;

        log_registration_action(event_id, principal.user_id, "cancel", "canceled");
        Ok(RegistrationChange::Canceled {
            registration,
            title: event.title,
        })
    }

    /// Remove the principal's registration row entirely
    pub async fn unregister(&self, principal: &Principal, event_id: i64) -> Result<RegistrationChange> {
        let event = self.event(event_id).await?;

        if !self.registrations.delete(principal.user_id, event_id).await? {
            return Err(self.not_registered(principal, event_id, "unregister"));
        }

        log_registration_action(event_id, principal.user_id, "unregister", "removed");
        Ok(RegistrationChange::Unregistered { title: event.title })
    }

    /// The principal's registrations of any status, by event date and time
    pub async fn registrations_for(&self, principal: &Principal) -> Result<Vec<RegisteredEvent>> {
        self.registrations.list_for_user(principal.user_id).await
    }

    pub async fn my_events(&self, principal: &Principal, today: NaiveDate) -> Result<MyEvents> {
        let registrations = self.registrations_for(principal).await?;
        let calendar = build_month_view(&registrations, today, self.exclude_canceled_from_month_view);

        debug!(
            user_id = principal.user_id,
            registrations = registrations.len(),
            month = calendar.month,
            "Built my events view"
        );

        Ok(MyEvents {
            registrations,
            calendar,
        })
    }

    async fn insert_if_absent(&self, principal: &Principal, event_id: i64) -> Result<(Registration, bool)> {
        for attempt in 1..=REGISTER_ATTEMPTS {
            match self.registrations.insert_if_absent(principal.user_id, event_id).await {
                Err(CampusEventsError::RegistrationNotFound { .. }) => {
                    debug!(user_id = principal.user_id, event_id, attempt, "Registration removed mid-insert, retrying");
                }
                other => return other,
            }
        }

        log_registration_action(event_id, principal.user_id, "register", "conflict");
        Err(CampusEventsError::Conflict(
            "Your registration changed while it was being saved. Please try again.".to_string(),
        ))
    }

    fn not_registered(&self, principal: &Principal, event_id: i64, action: &str) -> CampusEventsError {
        log_registration_action(event_id, principal.user_id, action, "not_registered");
        CampusEventsError::RegistrationNotFound {
            user_id: principal.user_id,
            event_id,
        }
    }
}
