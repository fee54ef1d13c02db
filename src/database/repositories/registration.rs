//! Registration repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::store::RegistrationStore;
use crate::models::registration::{
    RegisteredEvent, RegisteredEventRecord, Registration, RegistrationRecord, RegistrationStatus,
};
use crate::utils::errors::{CampusEventsError, Result};

const EVENT_FOREIGN_KEY: &str = "registrations_event_id_fkey";

#[derive(Clone, Debug)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, user_id: i64, event_id: i64) -> Result<Option<RegistrationRecord>> {
        let record = sqlx::query_as::<_, RegistrationRecord>(
            "SELECT id, user_id, event_id, status, registered_at FROM registrations WHERE user_id = $1 AND event_id = $2"
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

#[async_trait]
impl RegistrationStore for RegistrationRepository {
    async fn insert_if_absent(&self, user_id: i64, event_id: i64) -> Result<(Registration, bool)> {
        // The unique (user_id, event_id) index turns a concurrent duplicate into a no-op.
        let inserted = sqlx::query_as::<_, RegistrationRecord>(
            r#"
            INSERT INTO registrations (user_id, event_id, status, registered_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, event_id) DO NOTHING
            RETURNING id, user_id, event_id, status, registered_at
            "#
        )
        .bind(user_id)
        .bind(event_id)
        .bind(RegistrationStatus::Registered.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            let missing_event = matches!(
                &e,
                sqlx::Error::Database(db) if db.constraint() == Some(EVENT_FOREIGN_KEY)
            );
            if missing_event {
                CampusEventsError::EventNotFound { event_id }
            } else {
                CampusEventsError::Database(e)
            }
        })?;

        if let Some(record) = inserted {
            return Ok((record.try_into()?, true));
        }

        // Only an unregister racing this call can remove the row in between;
        // the caller retries.
        let existing = self
            .fetch(user_id, event_id)
            .await?
            .ok_or(CampusEventsError::RegistrationNotFound { user_id, event_id })?;

        Ok((existing.try_into()?, false))
    }

    async fn find(&self, user_id: i64, event_id: i64) -> Result<Option<Registration>> {
        self.fetch(user_id, event_id)
            .await?
            .map(Registration::try_from)
            .transpose()
    }

    /// Update registration status
    async fn set_status(&self, user_id: i64, event_id: i64, status: RegistrationStatus) -> Result<Option<Registration>> {
        let record = sqlx::query_as::<_, RegistrationRecord>(
            r#"
            UPDATE registrations
            SET status = $3
            WHERE user_id = $1 AND event_id = $2
            RETURNING id, user_id, event_id, status, registered_at
            "#
        )
        .bind(user_id)
        .bind(event_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        record.map(Registration::try_from).transpose()
    }

    async fn delete(&self, user_id: i64, event_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM registrations WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get events user is registered for
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<RegisteredEvent>> {
        let records = sqlx::query_as::<_, RegisteredEventRecord>(
            r#"
            SELECT r.id AS registration_id, e.id AS event_id, e.title, e.date, e.time, e.location, r.status
            FROM registrations r
            INNER JOIN events e ON e.id = r.event_id
            WHERE r.user_id = $1
            ORDER BY e.date ASC, e.time ASC, e.id ASC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(RegisteredEvent::try_from).collect()
    }
}
