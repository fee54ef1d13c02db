//! Event repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::store::EventStore;
use crate::models::event::{CreateEventRequest, Event, EventFields};
use crate::utils::errors::{CampusEventsError, Result};

const EVENT_COLUMNS: &str =
    "id, title, description, date, time, location, organizer_id, calendar_event_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[async_trait]
impl EventStore for EventRepository {
    /// Create a new event
    async fn create(&self, request: CreateEventRequest) -> Result<Event> {
        let now = Utc::now();
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, date, time, location, organizer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.fields.title)
        .bind(request.fields.description)
        .bind(request.fields.date)
        .bind(request.fields.time)
        .bind(request.fields.location)
        .bind(request.organizer_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_for_organizer(&self, id: i64, organizer_id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND organizer_id = $2"
        ))
        .bind(id)
        .bind(organizer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event
    async fn update_for_organizer(&self, id: i64, organizer_id: i64, fields: EventFields) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = $3,
                description = $4,
                date = $5,
                time = $6,
                location = $7,
                updated_at = $8
            WHERE id = $1 AND organizer_id = $2
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(organizer_id)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.date)
        .bind(fields.time)
        .bind(fields.location)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn set_calendar_event_id(&self, id: i64, calendar_event_id: Option<String>) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET calendar_event_id = $2,
                updated_at = $3
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(calendar_event_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        event.ok_or(CampusEventsError::EventNotFound { event_id: id })
    }

    /// Delete event; registrations go with it via ON DELETE CASCADE
    async fn delete_for_organizer(&self, id: i64, organizer_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND organizer_id = $2")
            .bind(id)
            .bind(organizer_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all events in chronological order
    async fn list(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, time ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
