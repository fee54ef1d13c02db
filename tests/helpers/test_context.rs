//! Test context for unified test setup
//!
//! Builds the full service stack over the in-memory store, with an optional
//! calendar adapter, plus token minting for API tests.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use campus_events::config::Settings;
use campus_events::database::{DatabaseService, MemoryStore};
use campus_events::middleware::{Claims, TokenVerifier};
use campus_events::services::{CalendarSync, ServiceFactory};
use campus_events::{router, AppState};

pub const TEST_JWT_SECRET: &str = "campus-events-test-secret";

/// Unified test context that manages all test components
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub database: DatabaseService,
    pub services: ServiceFactory,
    pub settings: Settings,
}

impl TestContext {
    /// Context without a calendar adapter
    pub fn new() -> Self {
        Self::with_calendar(None)
    }

    pub fn with_calendar(calendar: Option<Arc<dyn CalendarSync>>) -> Self {
        Self::with_settings(Self::test_settings(), calendar)
    }

    pub fn with_settings(settings: Settings, calendar: Option<Arc<dyn CalendarSync>>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let database = DatabaseService::in_memory(store.clone());
        let services = ServiceFactory::with_calendar(&settings, &database, calendar);

        Self {
            store,
            database,
            services,
            settings,
        }
    }

    pub fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
        settings
    }

    pub fn router(&self) -> Router {
        let state = AppState::new(
            self.services.clone(),
            self.database.clone(),
            TokenVerifier::new(&self.settings.auth),
        );
        router(state)
    }

    /// A bearer token the identity provider would issue for this user
    pub fn token(&self, user_id: i64, name: &str) -> String {
        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            iss: None,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }
}

/// Send one request through the router and decode the JSON response
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, token, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}
