//! Storage seams used by the services
//!
//! The PostgreSQL repositories implement these traits for production; the
//! in-memory store in [`crate::database::memory`] implements them for tests.

use async_trait::async_trait;

use crate::models::{
    CreateEventRequest, Event, EventFields, Principal, RegisteredEvent, Registration,
    RegistrationStatus, User,
};
use crate::utils::errors::Result;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event; `calendar_event_id` starts out null
    async fn create(&self, request: CreateEventRequest) -> Result<Event>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;

    /// Look up an event only if `organizer_id` organizes it
    async fn find_for_organizer(&self, id: i64, organizer_id: i64) -> Result<Option<Event>>;

    /// Overwrite the editable fields of an event owned by `organizer_id`
    async fn update_for_organizer(
        &self,
        id: i64,
        organizer_id: i64,
        fields: EventFields,
    ) -> Result<Option<Event>>;

    async fn set_calendar_event_id(&self, id: i64, calendar_event_id: Option<String>) -> Result<Event>;

    /// Delete an event owned by `organizer_id` together with its registrations
    async fn delete_for_organizer(&self, id: i64, organizer_id: i64) -> Result<bool>;

    /// All events ordered by (date, time, id)
    async fn list(&self) -> Result<Vec<Event>>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Atomic get-or-create keyed on (user, event).
    ///
    /// Returns the row and whether this call created it. Fails with
    /// `RegistrationNotFound` if a concurrent delete removes the row between
    /// the insert and the read.
    async fn insert_if_absent(&self, user_id: i64, event_id: i64) -> Result<(Registration, bool)>;

    async fn find(&self, user_id: i64, event_id: i64) -> Result<Option<Registration>>;

    async fn set_status(
        &self,
        user_id: i64,
        event_id: i64,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>>;

    async fn delete(&self, user_id: i64, event_id: i64) -> Result<bool>;

    /// The user's registrations of any status, ordered by event (date, time)
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<RegisteredEvent>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert the principal's user row on first sight; later calls refresh the username
    async fn upsert(&self, principal: &Principal) -> Result<User>;
}
