//! Google Calendar service implementation
//!
//! Mirrors campus events into a Google Calendar as one-hour UTC entries, and
//! builds "Add to Calendar" links and iCalendar exports for single events.
//!
//! Every adapter call authenticates from scratch: the service-account file is
//! read, an RS256 assertion is signed and exchanged for an access token. No
//! token is cached between calls.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GoogleConfig;
use crate::models::event::Event;
use crate::utils::errors::{CalendarError, CalendarResult, CampusEventsError, Result};
use crate::utils::helpers::{event_span, format_compact_utc, format_iso_seconds};
use crate::utils::logging::log_api_error;

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// External calendar the service mirrors events into
#[async_trait]
pub trait CalendarSync: Send + Sync {
    /// Create the remote entry and return its identifier
    async fn create_remote_event(&self, event: &Event) -> CalendarResult<String>;

    /// Overwrite the mirrored fields; no-op when the event was never synced
    async fn update_remote_event(&self, event: &Event) -> CalendarResult<()>;

    /// Remove the remote entry; no-op when the event was never synced
    async fn delete_remote_event(&self, event: &Event) -> CalendarResult<()>;
}

/// Google Calendar event body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleCalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: GoogleDateTime,
    pub end: GoogleDateTime,
    pub location: String,
}

/// Google Calendar date/time structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

impl From<&Event> for GoogleCalendarEvent {
    fn from(event: &Event) -> Self {
        let (start, end) = event_span(event.date, event.time);

        GoogleCalendarEvent {
            summary: event.title.clone(),
            description: event.description.clone(),
            start: GoogleDateTime {
                date_time: format_iso_seconds(start),
                time_zone: "UTC".to_string(),
            },
            end: GoogleDateTime {
                date_time: format_iso_seconds(end),
                time_zone: "UTC".to_string(),
            },
            location: event.location.clone(),
        }
    }
}

/// The fields of a service-account key file the token exchange needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Read and parse the key file at `path`
    pub async fn load(path: &str) -> CalendarResult<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CalendarError::Credentials(format!("cannot read {}: {}", path, e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| CalendarError::Credentials(format!("invalid service account file {}: {}", path, e)))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedEvent {
    id: String,
}

/// Per-call authenticated session against the Calendar API
struct CalendarSession {
    access_token: String,
}

/// Google Calendar service for event mirroring
#[derive(Clone)]
pub struct GoogleCalendarService {
    config: GoogleConfig,
    http_client: reqwest::Client,
}

impl GoogleCalendarService {
    /// Create a new GoogleCalendarService instance
    pub fn new(config: GoogleConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("campus-events/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CampusEventsError::Http)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.config.api_base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.calendar_id)
        )
    }

    fn event_url(&self, calendar_event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(calendar_event_id))
    }

    /// Sign a fresh assertion and exchange it for an access token
    async fn session(&self) -> CalendarResult<CalendarSession> {
        let key = ServiceAccountKey::load(&self.config.service_account_path).await?;

        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: CALENDAR_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();

        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        let assertion = jsonwebtoken::encode(&header, &claims, &signing_key)?;

        debug!(client_email = %key.client_email, "Requesting Google access token");

        let response = self
            .http_client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log_api_error("google-oauth", &body, Some(&format!("status {}", status)));
            return Err(CalendarError::AuthenticationFailed(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::InvalidResponse(e.to_string()))?;

        Ok(CalendarSession {
            access_token: token.access_token,
        })
    }

    async fn check(response: reqwest::Response, operation: &str) -> CalendarResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        log_api_error("google-calendar", &message, Some(operation));
        Err(CalendarError::Api { status, message })
    }
}

#[async_trait]
impl CalendarSync for GoogleCalendarService {
    /// Create a new event in Google Calendar
    async fn create_remote_event(&self, event: &Event) -> CalendarResult<String> {
        info!(event_id = event.id, title = %event.title, "Creating Google Calendar event");

        let session = self.session().await?;
        let body = GoogleCalendarEvent::from(event);

        let response = self
            .http_client
            .post(self.events_url())
            .bearer_auth(&session.access_token)
            .json(&body)
            .send()
            .await?;

        let created: CreatedEvent = Self::check(response, "insert")
            .await?
            .json()
            .await
            .map_err(|e| CalendarError::InvalidResponse(e.to_string()))?;

        info!(event_id = event.id, calendar_event_id = %created.id, "Google Calendar event created");
        Ok(created.id)
    }

    /// Update an existing event in Google Calendar
    async fn update_remote_event(&self, event: &Event) -> CalendarResult<()> {
        let Some(calendar_event_id) = event.calendar_event_id.as_deref() else {
            debug!(event_id = event.id, "Event has no calendar id, skipping remote update");
            return Ok(());
        };

        info!(event_id = event.id, calendar_event_id = %calendar_event_id, "Updating Google Calendar event");

        let session = self.session().await?;
        let response = self
            .http_client
            .patch(self.event_url(calendar_event_id))
            .bearer_auth(&session.access_token)
            .json(&GoogleCalendarEvent::from(event))
            .send()
            .await?;

        Self::check(response, "patch").await?;
        Ok(())
    }

    /// Delete an event from Google Calendar
    async fn delete_remote_event(&self, event: &Event) -> CalendarResult<()> {
        let Some(calendar_event_id) = event.calendar_event_id.as_deref() else {
            return Ok(());
        };

        info!(event_id = event.id, calendar_event_id = %calendar_event_id, "Deleting Google Calendar event");

        let session = self.session().await?;
        let response = self
            .http_client
            .delete(self.event_url(calendar_event_id))
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        // Already gone on the remote side.
        if matches!(response.status().as_u16(), 404 | 410) {
            debug!(calendar_event_id = %calendar_event_id, "Remote event already deleted");
            return Ok(());
        }

        Self::check(response, "delete").await?;
        Ok(())
    }
}

/// Generate "Add to Calendar" URL for an event
pub fn generate_add_to_calendar_url(event: &Event) -> String {
    let (start, end) = event_span(event.date, event.time);

    let mut url = "https://calendar.google.com/calendar/render?action=TEMPLATE".to_string();
    url.push_str(&format!("&text={}", urlencoding::encode(&event.title)));
    url.push_str(&format!("&dates={}/{}", format_compact_utc(start), format_compact_utc(end)));

    if !event.description.is_empty() {
        url.push_str(&format!("&details={}", urlencoding::encode(&event.description)));
    }

    if !event.location.is_empty() {
        url.push_str(&format!("&location={}", urlencoding::encode(&event.location)));
    }

    url
}

/// Escape a TEXT value per RFC 5545
fn escape_ical_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

/// Generate iCal format for event
pub fn generate_ical(event: &Event) -> String {
    let (start, end) = event_span(event.date, event.time);
    let stamp = event.updated_at.format("%Y%m%dT%H%M%SZ").to_string();

    let mut ical = String::new();
    ical.push_str("BEGIN:VCALENDAR\r\n");
    ical.push_str("VERSION:2.0\r\n");
    ical.push_str("PRODID:-//Campus Events//Campus Events//EN\r\n");
    ical.push_str("BEGIN:VEVENT\r\n");
    ical.push_str(&format!("UID:campus-event-{}\r\n", event.id));
    ical.push_str(&format!("DTSTART:{}\r\n", format_compact_utc(start)));
    ical.push_str(&format!("DTEND:{}\r\n", format_compact_utc(end)));
    ical.push_str(&format!("DTSTAMP:{}\r\n", stamp));
    ical.push_str(&format!("SUMMARY:{}\r\n", escape_ical_text(&event.title)));

    if !event.description.is_empty() {
        ical.push_str(&format!("DESCRIPTION:{}\r\n", escape_ical_text(&event.description)));
    }

    if !event.location.is_empty() {
        ical.push_str(&format!("LOCATION:{}\r\n", escape_ical_text(&event.location)));
    }

    ical.push_str("STATUS:CONFIRMED\r\n");
    ical.push_str("END:VEVENT\r\n");
    ical.push_str("END:VCALENDAR\r\n");

    ical
}
