//! HTTP error responses
//!
//! Maps application errors to a status code and a JSON body of the form
//! `{error, message, fields?}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::services::registration::NOT_REGISTERED_MESSAGE;
use crate::utils::errors::{CampusEventsError, FieldError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

/// Handler error wrapping an application error
#[derive(Debug)]
pub struct ApiError(pub CampusEventsError);

impl From<CampusEventsError> for ApiError {
    fn from(err: CampusEventsError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CampusEventsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CampusEventsError::EventNotFound { .. } | CampusEventsError::RegistrationNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            CampusEventsError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            CampusEventsError::Conflict(_) => StatusCode::CONFLICT,
            CampusEventsError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CampusEventsError::Calendar(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match &self.0 {
            CampusEventsError::Validation(errors) => ErrorBody {
                error: "validation_error",
                message: "Please correct the errors below.".to_string(),
                fields: Some(errors.fields.clone()),
            },
            CampusEventsError::EventNotFound { .. } => ErrorBody {
                error: "not_found",
                message: "Event not found.".to_string(),
                fields: None,
            },
            CampusEventsError::RegistrationNotFound { .. } => ErrorBody {
                error: "not_registered",
                message: NOT_REGISTERED_MESSAGE.to_string(),
                fields: None,
            },
            CampusEventsError::PermissionDenied(message) => ErrorBody {
                error: "forbidden",
                message: message.clone(),
                fields: None,
            },
            CampusEventsError::Conflict(message) => ErrorBody {
                error: "conflict",
                message: message.clone(),
                fields: None,
            },
            CampusEventsError::Authentication(message) => ErrorBody {
                error: "unauthorized",
                message: message.clone(),
                fields: None,
            },
            CampusEventsError::Calendar(_) => ErrorBody {
                error: "external_service_error",
                message: "The calendar service is unavailable.".to_string(),
                fields: None,
            },
            _ => ErrorBody {
                error: "internal_error",
                message: "Internal server error".to_string(),
                fields: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self.0, severity = ?self.0.severity(), "Request failed");
        } else if status == StatusCode::NOT_FOUND {
            warn!(error = %self.0, "Requested resource not found");
        }

        (status, Json(self.body())).into_response()
    }
}
