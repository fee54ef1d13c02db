//! Registration handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::handlers::error::ApiError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::registration::{MyEvents, RegistrationChange};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub message: String,
    #[serde(flatten)]
    pub change: RegistrationChange,
}

impl From<RegistrationChange> for RegistrationResponse {
    fn from(change: RegistrationChange) -> Self {
        Self {
            message: change.message(),
            change,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MyEventsQuery {
    /// Reference date for the calendar grid; defaults to today (UTC)
    pub today: Option<NaiveDate>,
}

/// POST /events/:id/register
pub async fn register(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(event_id): Path<i64>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let change = state
        .services
        .registration_service
        .register(&principal, event_id)
        .await?;
    Ok(Json(change.into()))
}

/// POST /events/:id/cancel
pub async fn cancel(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(event_id): Path<i64>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let change = state
        .services
        .registration_service
        .cancel(&principal, event_id)
        .await?;
    Ok(Json(change.into()))
}

/// POST /events/:id/unregister
pub async fn unregister(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(event_id): Path<i64>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let change = state
        .services
        .registration_service
        .unregister(&principal, event_id)
        .await?;
    Ok(Json(change.into()))
}

/// GET /my-events
pub async fn my_events(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(query): Query<MyEventsQuery>,
) -> Result<Json<MyEvents>, ApiError> {
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let view = state
        .services
        .registration_service
        .my_events(&principal, today)
        .await?;
    Ok(Json(view))
}
