//! User service implementation
//!
//! Keeps the user directory in step with the identity provider: every
//! authenticated principal gets a user row the first time it is seen.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::store::UserStore;
use crate::models::user::{Principal, User};
use crate::utils::errors::Result;

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Register a new user or get existing user
    pub async fn register_or_get_user(&self, principal: &Principal) -> Result<User> {
        debug!(user_id = principal.user_id, "Attempting to register or get user");

        let user = self.users.upsert(principal).await?;
        info!(user_id = user.id, username = %user.username, "User registered or refreshed");

        Ok(user)
    }
}
