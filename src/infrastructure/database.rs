//! Pooled SQLite connection

use crate::config::Settings;
use di::inject;
use di::injectable;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::ops::Deref;
use std::sync::{Mutex, PoisonError};

/// Pool handed out instead of the configured one while set, so DI-built
/// routers in integration tests talk to an in-memory database.
static TEST_POOL: Mutex<Option<SqlitePool>> = Mutex::new(None);

pub struct DatabaseConnection {
    connection: SqlitePool,
}

#[injectable]
impl DatabaseConnection {
    #[inject]
    pub fn create() -> DatabaseConnection {
        if let Some(pool) = TEST_POOL
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return DatabaseConnection { connection: pool };
        }

        let settings = Settings::installed()
            .expect("settings must be installed before the database connection is resolved");

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_lazy(&settings.database_url)
            .expect("Cannot connect to database");

        DatabaseConnection { connection: pool }
    }
}

impl DatabaseConnection {
    pub fn from_pool(pool: SqlitePool) -> DatabaseConnection {
        DatabaseConnection { connection: pool }
    }

    #[doc(hidden)]
    pub fn set_test_pool(pool: SqlitePool) {
        *TEST_POOL.lock().unwrap_or_else(PoisonError::into_inner) = Some(pool);
    }

    #[doc(hidden)]
    pub fn clear_test_pool() {
        TEST_POOL
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl Deref for DatabaseConnection {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}
