//! HTTP handlers module
//!
//! This module contains the JSON API handlers organized by resource:
//! - Event handlers for browsing and organizer-only management
//! - Registration handlers for the per-user lifecycle and "my events"
//! - System handlers for service info and health

pub mod error;
pub mod events;
pub mod form;
pub mod registrations;
pub mod system;

use axum::{
    routing::{get, post},
    Router,
};

use crate::middleware::logging::trace_layer;
use crate::state::AppState;

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(system::index))
        .route("/health", get(system::health))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:id/ics", get(events::export_ics))
        .route("/events/:id/register", post(registrations::register))
        .route("/events/:id/cancel", post(registrations::cancel))
        .route("/events/:id/unregister", post(registrations::unregister))
        .route("/my-events", get(registrations::my_events))
        .layer(trace_layer())
        .with_state(state)
}
