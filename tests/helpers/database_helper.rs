//! Test database helper utilities
//!
//! PostgreSQL tests run against the database named by `TEST_DATABASE_URL` and
//! are skipped when it is not set.

use campus_events::database::{create_pool, run_migrations, DatabaseConfig, DatabasePool};

/// Test database helper that manages PostgreSQL test database setup
pub struct TestDatabase {
    pub pool: DatabasePool,
    pub database_url: String,
}

impl TestDatabase {
    /// Connect, migrate and empty the test database; `None` without `TEST_DATABASE_URL`
    pub async fn from_env() -> Option<Self> {
        let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        };

        let config = DatabaseConfig {
            url: database_url.clone(),
            max_connections: 5,
            ..DatabaseConfig::default()
        };

        let pool = create_pool(&config).await.expect("Failed to connect to test database");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let db = Self { pool, database_url };
        db.cleanup().await.expect("Failed to clean test database");
        Some(db)
    }

    /// Clean all test data from the database
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        sqlx::query("TRUNCATE registrations, events, users RESTART IDENTITY CASCADE")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn count_records(&self, table: &str) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
