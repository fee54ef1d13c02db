//! Service info and health handlers

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::handlers::error::ApiError;
use crate::state::AppState;

/// GET /
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": crate::NAME,
        "version": crate::VERSION,
        "calendar_sync": state.services.event_service.calendar_enabled(),
    }))
}

/// GET /health - database check
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.database.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}
