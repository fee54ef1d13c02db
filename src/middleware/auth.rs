//! Authentication middleware
//!
//! Verifies the identity provider's HS256 bearer tokens and turns them into a
//! [`Principal`]. Handlers require authentication by taking an
//! [`AuthenticatedUser`] argument.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::handlers::error::ApiError;
use crate::models::user::Principal;
use crate::state::AppState;
use crate::utils::errors::{CampusEventsError, Result};

/// Claims carried by identity provider tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id
    pub sub: String,
    pub name: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry, then map the claims to a principal
    pub fn verify(&self, token: &str) -> Result<Principal> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            CampusEventsError::Authentication("Invalid or expired token".to_string())
        })?;

        let user_id = data.claims.sub.parse::<i64>().map_err(|_| {
            CampusEventsError::Authentication("Token subject is not a user id".to_string())
        })?;

        Ok(Principal::new(user_id, data.claims.name))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str> {
    let header = header.ok_or_else(|| {
        CampusEventsError::Authentication("Missing authorization header".to_string())
    })?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(CampusEventsError::Authentication(
            "Invalid authorization format. Expected 'Bearer <token>'".to_string(),
        )),
    }
}

/// The authenticated caller, recorded in the user directory
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let principal = bearer_token(header).and_then(|token| state.verifier.verify(token)).map_err(|e| {
            warn!(path = %parts.uri.path(), error = %e, "Unauthenticated request");
            e
        })?;

        state
            .services
            .user_service
            .register_or_get_user(&principal)
            .await?;

        Ok(Self(principal))
    }
}
