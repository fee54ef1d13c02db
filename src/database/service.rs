//! Database service layer
//!
//! Bundles the storage trait objects the business services are built from.

use std::sync::Arc;

use crate::database::memory::MemoryStore;
use crate::database::store::{EventStore, RegistrationStore, UserStore};
use crate::database::{health_check, DatabasePool, EventRepository, RegistrationRepository, UserRepository};
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct DatabaseService {
    pub events: Arc<dyn EventStore>,
    pub registrations: Arc<dyn RegistrationStore>,
    pub users: Arc<dyn UserStore>,
    pool: Option<DatabasePool>,
}

impl DatabaseService {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: Arc::new(EventRepository::new(pool.clone())),
            registrations: Arc::new(RegistrationRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// All three stores backed by one shared in-memory data set
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            events: store.clone(),
            registrations: store.clone(),
            users: store,
            pool: None,
        }
    }

    /// Check the backing database; the in-memory backend is always healthy
    pub async fn health_check(&self) -> Result<()> {
        match &self.pool {
            Some(pool) => health_check(pool).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Principal;

    #[tokio::test]
    async fn test_in_memory_service_shares_one_data_set() {
        let store = Arc::new(MemoryStore::new());
        let service = DatabaseService::in_memory(store.clone());

        service.users.upsert(&Principal::new(7, "testuser")).await.unwrap();
        assert_eq!(store.data().users.len(), 1);
        assert!(service.health_check().await.is_ok());
    }
}
