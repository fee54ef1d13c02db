//! Shared application state
//!
//! Everything a request handler needs, cloned cheaply into each request.

use std::sync::Arc;

use crate::database::DatabaseService;
use crate::middleware::auth::TokenVerifier;
use crate::services::ServiceFactory;

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ServiceFactory>,
    pub database: DatabaseService,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(services: ServiceFactory, database: DatabaseService, verifier: TokenVerifier) -> Self {
        Self {
            services: Arc::new(services),
            database,
            verifier: Arc::new(verifier),
        }
    }
}
