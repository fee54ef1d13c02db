//! Event form extraction
//!
//! Parses create/edit bodies so that malformed JSON, missing fields and
//! unparseable dates come back in the same field-error shape as
//! [`EventInput::validate`].

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::handlers::error::ApiError;
use crate::models::event::EventInput;
use crate::utils::errors::{CampusEventsError, ValidationErrors};

const REQUIRED: &str = "This field is required.";

/// JSON body decoded into an [`EventInput`]
#[derive(Debug, Clone)]
pub struct EventForm(pub EventInput);

#[async_trait]
impl<S> FromRequest<S> for EventForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await.map_err(|rejection| {
            debug!(error = %rejection.body_text(), "Rejected event body");
            body_error(rejection.body_text())
        })?;

        parse_event_input(body).map(Self).map_err(ApiError::from)
    }
}

/// Decode an event body, reporting every unusable field
pub fn parse_event_input(mut body: Value) -> Result<EventInput, CampusEventsError> {
    let Some(object) = body.as_object_mut() else {
        return Err(body_error("Expected a JSON object."));
    };

    let mut errors = ValidationErrors::new();
    check_field::<String>(&mut errors, object.get("title"), "title", true, "Enter a valid text value.");
    check_field::<String>(&mut errors, object.get("description"), "description", false, "Enter a valid text value.");
    check_field::<String>(&mut errors, object.get("location"), "location", false, "Enter a valid text value.");
    check_field::<NaiveDate>(&mut errors, object.get("date"), "date", true, "Enter a valid date.");
    check_field::<NaiveTime>(&mut errors, object.get("time"), "time", true, "Enter a valid time.");
    check_field::<bool>(&mut errors, object.get("sync_to_calendar"), "sync_to_calendar", false, "Enter true or false.");
    errors.into_result()?;

    object.retain(|_, value| !value.is_null());
    serde_json::from_value(body).map_err(|e| body_error(e.to_string()))
}

fn check_field<T: DeserializeOwned>(
    errors: &mut ValidationErrors,
    value: Option<&Value>,
    field: &'static str,
    required: bool,
    invalid: &str,
) {
    match value {
        None | Some(Value::Null) if required => errors.add(field, REQUIRED),
        None | Some(Value::Null) => {}
        Some(value) => {
            if serde_json::from_value::<T>(value.clone()).is_err() {
                errors.add(field, invalid);
            }
        }
    }
}

fn body_error(message: impl Into<String>) -> CampusEventsError {
    let mut errors = ValidationErrors::new();
    errors.add("body", message);
    CampusEventsError::Validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn fields(err: CampusEventsError) -> ValidationErrors {
        match err {
            CampusEventsError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_body_parses() {
        let input = parse_event_input(json!({
            "title": "Test Event",
            "date": "2025-03-20",
            "time": "12:00:00",
            "location": "Campus Hall",
            "sync_to_calendar": true
        }))
        .unwrap();

        assert_eq!(input.title, "Test Event");
        assert_eq!(input.time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert!(input.description.is_empty());
        assert!(input.sync_to_calendar);
    }

    #[test]
    fn test_missing_and_malformed_fields_reported_together() {
        let errors = fields(
            parse_event_input(json!({ "date": "not-a-date", "time": "noon", "location": 7 })).unwrap_err(),
        );

        assert!(errors.has_field("title"));
        assert!(errors.has_field("date"));
        assert!(errors.has_field("time"));
        assert!(errors.has_field("location"));
        assert!(!errors.has_field("description"));
    }

    #[test]
    fn test_non_object_body() {
        let result = parse_event_input(json!(["Test Event"]));
        assert_matches!(result, Err(CampusEventsError::Validation(ref e)) if e.has_field("body"));
    }
}
