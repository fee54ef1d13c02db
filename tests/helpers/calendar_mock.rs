//! Mock Google APIs and calendar fakes for testing
//!
//! `GoogleMockServer` stands in for both the OAuth token endpoint and the
//! Calendar v3 API using wiremock. `RecordingCalendar` is an in-process
//! `CalendarSync` that records every call.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use campus_events::config::GoogleConfig;
use campus_events::models::Event;
use campus_events::services::CalendarSync;
use campus_events::utils::errors::{CalendarError, CalendarResult};

pub const TEST_ACCESS_TOKEN: &str = "test-access-token";
pub const TEST_CALENDAR_ID: &str = "primary";
pub const EVENTS_PATH: &str = "/calendar/v3/calendars/primary/events";

const SERVICE_ACCOUNT_FIXTURE: &str = include_str!("../fixtures/service_account.json");

/// Mock Google token and Calendar server
pub struct GoogleMockServer {
    pub server: MockServer,
    credentials: NamedTempFile,
}

impl GoogleMockServer {
    /// Start the server and write a credential file pointing at its token endpoint
    pub async fn new() -> Self {
        let server = MockServer::start().await;

        let mut key: Value = serde_json::from_str(SERVICE_ACCOUNT_FIXTURE).unwrap();
        key["token_uri"] = json!(format!("{}/token", server.uri()));

        let mut credentials = NamedTempFile::new().unwrap();
        credentials
            .write_all(serde_json::to_string(&key).unwrap().as_bytes())
            .unwrap();

        Self { server, credentials }
    }

    pub fn credentials_path(&self) -> String {
        self.credentials.path().to_string_lossy().into_owned()
    }

    pub fn google_config(&self) -> GoogleConfig {
        GoogleConfig {
            service_account_path: self.credentials_path(),
            calendar_id: TEST_CALENDAR_ID.to_string(),
            api_base_url: format!("{}/calendar/v3", self.server.uri()),
            request_timeout_seconds: 5,
        }
    }

    /// Token endpoint accepting JWT bearer assertions, expected `times` times
    pub async fn mock_token(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TEST_ACCESS_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_token_rejected(&self) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid JWT Signature."
            })))
            .mount(&self.server)
            .await;
    }

    /// Event insert returning `calendar_event_id`
    pub async fn mock_insert(&self, calendar_event_id: &str) {
        Mock::given(method("POST"))
            .and(path(EVENTS_PATH))
            .and(header("authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": calendar_event_id,
                "status": "confirmed"
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_insert_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "code": status, "message": "Backend Error" }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_patch(&self, calendar_event_id: &str) {
        Mock::given(method("PATCH"))
            .and(path(format!("{}/{}", EVENTS_PATH, calendar_event_id)))
            .and(header("authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": calendar_event_id
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_delete(&self, calendar_event_id: &str, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("{}/{}", EVENTS_PATH, calendar_event_id)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Requests that hit the Calendar API (token requests excluded)
    pub async fn calendar_requests(&self) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().starts_with("/calendar/v3"))
            .collect()
    }
}

/// In-process calendar that records calls and can be told to fail
#[derive(Default)]
pub struct RecordingCalendar {
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingCalendar {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, event: &Event) -> CalendarResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", operation, event.id));

        if self.fail {
            return Err(CalendarError::Api {
                status: 503,
                message: "Backend Error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarSync for RecordingCalendar {
    async fn create_remote_event(&self, event: &Event) -> CalendarResult<String> {
        self.record("create", event)?;
        Ok(format!("remote-{}", event.id))
    }

    async fn update_remote_event(&self, event: &Event) -> CalendarResult<()> {
        self.record("update", event)
    }

    async fn delete_remote_event(&self, event: &Event) -> CalendarResult<()> {
        self.record("delete", event)
    }
}
