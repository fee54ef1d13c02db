//! Event model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::ValidationErrors;

pub const TITLE_MAX_CHARS: usize = 100;
pub const LOCATION_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub organizer_id: i64,
    pub calendar_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_synced(&self) -> bool {
        self.calendar_event_id.is_some()
    }
}

/// Raw create/edit input as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub sync_to_calendar: bool,
}

/// Validated, normalized event fields ready for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct CreateEventRequest {
    pub fields: EventFields,
    pub organizer_id: i64,
}

impl EventInput {
    /// Check every field and return the normalized values or all failures at once
    pub fn validate(&self) -> Result<EventFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = self.title.trim();
        let description = self.description.trim();
        let location = self.location.trim();

        check_text(&mut errors, "title", title, Some(TITLE_MAX_CHARS));
        check_text(&mut errors, "description", description, None);
        check_text(&mut errors, "location", location, Some(LOCATION_MAX_CHARS));

        errors.into_result()?;

        Ok(EventFields {
            title: title.to_string(),
            description: description.to_string(),
            date: self.date,
            time: self.time,
            location: location.to_string(),
        })
    }
}

fn check_text(errors: &mut ValidationErrors, field: &'static str, value: &str, max_chars: Option<usize>) {
    if value.is_empty() {
        errors.add(field, "This field is required.");
        return;
    }

    if let Some(max) = max_chars {
        let len = value.chars().count();
        if len > max {
            errors.add(
                field,
                format!("Ensure this value has at most {} characters (it has {}).", max, len),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> EventInput {
        EventInput {
            title: "Test Event".to_string(),
            description: "Just a test".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            location: "Campus Hall".to_string(),
            sync_to_calendar: false,
        }
    }

    #[test]
    fn test_valid_input_is_trimmed() {
        let mut raw = input();
        raw.title = "  Test Event  ".to_string();

        let fields = raw.validate().unwrap();
        assert_eq!(fields.title, "Test Event");
        assert_eq!(fields.location, "Campus Hall");
    }

    #[test]
    fn test_blank_fields_reported_together() {
        let mut raw = input();
        raw.title = "   ".to_string();
        raw.description = String::new();

        let errors = raw.validate().unwrap_err();
        assert!(errors.has_field("title"));
        assert!(errors.has_field("description"));
        assert!(!errors.has_field("location"));
    }

    #[test]
    fn test_length_limits_count_characters() {
        let mut raw = input();
        raw.title = "é".repeat(TITLE_MAX_CHARS);
        assert!(raw.validate().is_ok());

        raw.title = "x".repeat(TITLE_MAX_CHARS + 1);
        raw.location = "y".repeat(LOCATION_MAX_CHARS + 1);
        let errors = raw.validate().unwrap_err();
        assert!(errors.has_field("title"));
        assert!(errors.has_field("location"));
    }

    #[test]
    fn test_input_deserializes_iso_date_and_time() {
        let raw: EventInput = serde_json::from_str(
            r#"{"title":"Test Event","description":"d","date":"2025-03-20","time":"12:00:00","location":"Campus Hall"}"#,
        )
        .unwrap();
        assert_eq!(raw.date, NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
        assert_eq!(raw.time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert!(!raw.sync_to_calendar);
    }
}
