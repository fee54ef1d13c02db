//! Registration model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::CampusEventsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Registered,
    Canceled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "Registered",
            RegistrationStatus::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = CampusEventsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Registered" => Ok(RegistrationStatus::Registered),
            "Canceled" => Ok(RegistrationStatus::Canceled),
            other => Err(CampusEventsError::InvalidData(format!(
                "unknown registration status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

/// A registration joined with the event fields the "my events" page shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredEvent {
    pub registration_id: i64,
    pub event_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub status: RegistrationStatus,
}

/// Row shape of `registrations`; status is stored as text
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRecord {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRecord> for Registration {
    type Error = CampusEventsError;

    fn try_from(record: RegistrationRecord) -> Result<Self, Self::Error> {
        Ok(Registration {
            id: record.id,
            user_id: record.user_id,
            event_id: record.event_id,
            status: record.status.parse()?,
            registered_at: record.registered_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RegisteredEventRecord {
    pub registration_id: i64,
    pub event_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub status: String,
}

impl TryFrom<RegisteredEventRecord> for RegisteredEvent {
    type Error = CampusEventsError;

    fn try_from(record: RegisteredEventRecord) -> Result<Self, Self::Error> {
        Ok(RegisteredEvent {
            registration_id: record.registration_id,
            event_id: record.event_id,
            title: record.title,
            date: record.date,
            time: record.time,
            location: record.location,
            status: record.status.parse()?,
        })
    }
}
