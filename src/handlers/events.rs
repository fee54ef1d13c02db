//! Event handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::debug;

use crate::handlers::error::ApiError;
use crate::handlers::form::EventForm;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::event::Event;
use crate::services::events::{EventDetail, EventOutcome};
use crate::state::AppState;

/// GET /events - every event by date and time
pub async fn list_events(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<Vec<Event>>, ApiError> {
    debug!(user_id = principal.user_id, "Listing events");
    let events = state.services.event_service.list_events().await?;
    Ok(Json(events))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    EventForm(input): EventForm,
) -> Result<(StatusCode, Json<EventOutcome>), ApiError> {
    let outcome = state
        .services
        .event_service
        .create_event(&principal, input)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /events/:id
pub async fn get_event(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<EventDetail>, ApiError> {
    let detail = state
        .services
        .event_service
        .get_event_detail(id, &principal)
        .await?;
    Ok(Json(detail))
}

/// PUT /events/:id - organizer only
pub async fn update_event(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<i64>,
    EventForm(input): EventForm,
) -> Result<Json<EventOutcome>, ApiError> {
    let outcome = state
        .services
        .event_service
        .update_event(id, &principal, input)
        .await?;
    Ok(Json(outcome))
}

/// DELETE /events/:id - organizer only
pub async fn delete_event(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<EventOutcome>, ApiError> {
    let outcome = state
        .services
        .event_service
        .delete_event(id, &principal)
        .await?;
    Ok(Json(outcome))
}

/// GET /events/:id/ics
pub async fn export_ics(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let ical = state.services.event_service.export_ics(id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"event-{}.ics\"", id),
            ),
        ],
        ical,
    ))
}
