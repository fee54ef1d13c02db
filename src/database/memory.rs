//! In-memory storage backend
//!
//! Implements every storage trait over a single mutex-guarded data set, so
//! cascading deletes and the get-or-create primitive behave as they do in
//! PostgreSQL. Used by the test suites; the mutex makes each operation atomic.
//!
//! Setting [`MemoryData::next_error`] makes the next store call fail with that
//! error, simulating a database failure.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::database::store::{EventStore, RegistrationStore, UserStore};
use crate::models::{
    CreateEventRequest, Event, EventFields, Principal, RegisteredEvent, Registration,
    RegistrationStatus, User,
};
use crate::utils::errors::{CampusEventsError, Result};

#[derive(Default)]
pub struct MemoryData {
    pub users: Vec<User>,
    pub events: Vec<Event>,
    pub registrations: Vec<Registration>,
    next_event_id: i64,
    next_registration_id: i64,
    /// If set, the next store call returns this error instead of running.
    pub next_error: Option<CampusEventsError>,
}

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the simulated tables
    pub fn data(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lock the data and consume a pending simulated failure
    fn lock(&self) -> Result<MutexGuard<'_, MemoryData>> {
        let mut data = self.data();
        match data.next_error.take() {
            Some(err) => Err(err),
            None => Ok(data),
        }
    }
}

impl MemoryData {
    fn event_mut(&mut self, id: i64) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == id)
    }

    fn registration_position(&self, user_id: i64, event_id: i64) -> Option<usize> {
        self.registrations
            .iter()
            .position(|r| r.user_id == user_id && r.event_id == event_id)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create(&self, request: CreateEventRequest) -> Result<Event> {
        let mut data = self.lock()?;
        data.next_event_id += 1;

        let now = Utc::now();
        let event = Event {
            id: data.next_event_id,
            title: request.fields.title,
            description: request.fields.description,
            date: request.fields.date,
            time: request.fields.time,
            location: request.fields.location,
            organizer_id: request.organizer_id,
            calendar_event_id: None,
            created_at: now,
            updated_at: now,
        };
        data.events.push(event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let data = self.lock()?;
        Ok(data.events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_for_organizer(&self, id: i64, organizer_id: i64) -> Result<Option<Event>> {
        let data = self.lock()?;
        Ok(data
            .events
            .iter()
            .find(|e| e.id == id && e.organizer_id == organizer_id)
            .cloned())
    }

    async fn update_for_organizer(&self, id: i64, organizer_id: i64, fields: EventFields) -> Result<Option<Event>> {
        let mut data = self.lock()?;
        let Some(event) = data.event_mut(id).filter(|e| e.organizer_id == organizer_id) else {
            return Ok(None);
        };

        event.title = fields.title;
        event.description = fields.description;
        event.date = fields.date;
        event.time = fields.time;
        event.location = fields.location;
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }

    async fn set_calendar_event_id(&self, id: i64, calendar_event_id: Option<String>) -> Result<Event> {
        let mut data = self.lock()?;
        let event = data
            .event_mut(id)
            .ok_or(CampusEventsError::EventNotFound { event_id: id })?;

        event.calendar_event_id = calendar_event_id;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn delete_for_organizer(&self, id: i64, organizer_id: i64) -> Result<bool> {
        let mut data = self.lock()?;
        let before = data.events.len();
        data.events.retain(|e| !(e.id == id && e.organizer_id == organizer_id));
        if data.events.len() == before {
            return Ok(false);
        }

        data.registrations.retain(|r| r.event_id != id);
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let data = self.lock()?;
        let mut events = data.events.clone();
        events.sort_by_key(|e| (e.date, e.time, e.id));
        Ok(events)
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn insert_if_absent(&self, user_id: i64, event_id: i64) -> Result<(Registration, bool)> {
        let mut data = self.lock()?;

        if let Some(pos) = data.registration_position(user_id, event_id) {
            return Ok((data.registrations[pos].clone(), false));
        }

        if !data.events.iter().any(|e| e.id == event_id) {
            return Err(CampusEventsError::EventNotFound { event_id });
        }

        data.next_registration_id += 1;
        let registration = Registration {
            id: data.next_registration_id,
            user_id,
            event_id,
            status: RegistrationStatus::Registered,
            registered_at: Utc::now(),
        };
        data.registrations.push(registration.clone());
        Ok((registration, true))
    }

    async fn find(&self, user_id: i64, event_id: i64) -> Result<Option<Registration>> {
        let data = self.lock()?;
        Ok(data
            .registration_position(user_id, event_id)
            .map(|pos| data.registrations[pos].clone()))
    }

    async fn set_status(&self, user_id: i64, event_id: i64, status: RegistrationStatus) -> Result<Option<Registration>> {
        let mut data = self.lock()?;
        let Some(pos) = data.registration_position(user_id, event_id) else {
            return Ok(None);
        };

        data.registrations[pos].status = status;
        Ok(Some(data.registrations[pos].clone()))
    }

    async fn delete(&self, user_id: i64, event_id: i64) -> Result<bool> {
        let mut data = self.lock()?;
        match data.registration_position(user_id, event_id) {
            Some(pos) => {
                data.registrations.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<RegisteredEvent>> {
        let data = self.lock()?;
        let mut joined: Vec<(i64, RegisteredEvent)> = data
            .registrations
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                data.events.iter().find(|e| e.id == r.event_id).map(|e| {
                    (
                        e.id,
                        RegisteredEvent {
                            registration_id: r.id,
                            event_id: e.id,
                            title: e.title.clone(),
                            date: e.date,
                            time: e.time,
                            location: e.location.clone(),
                            status: r.status,
                        },
                    )
                })
            })
            .collect();

        joined.sort_by_key(|(id, r)| (r.date, r.time, *id));
        Ok(joined.into_iter().map(|(_, r)| r).collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert(&self, principal: &Principal) -> Result<User> {
        let mut data = self.lock()?;

        if let Some(user) = data.users.iter_mut().find(|u| u.id == principal.user_id) {
            user.username = principal.username.clone();
            return Ok(user.clone());
        }

        let user = User {
            id: principal.user_id,
            username: principal.username.clone(),
            created_at: Utc::now(),
        };
        data.users.push(user.clone());
        Ok(user)
    }
}
