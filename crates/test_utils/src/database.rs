//! Database Test Utilities
//!
//! Starts PostgreSQL in a container and applies the ledger schema. Tests
//! that use this need Docker and are marked `#[ignore]` by convention.

use once_cell::sync::Lazy;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use core_kernel::PartyId;

const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "ricemill_test";

/// Image tag, overridable with `TEST_POSTGRES_TAG`
static POSTGRES_TAG: Lazy<String> =
    Lazy::new(|| std::env::var("TEST_POSTGRES_TAG").unwrap_or_else(|_| "16-alpine".to_string()));

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A PostgreSQL container with the ledger schema applied
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a container and applies the schema
    ///
    /// # Errors
    ///
    /// Returns an error if Docker is unavailable, the container does not
    /// start, or the schema fails to apply
    pub async fn new() -> Result<Self, BoxError> {
        let container = Postgres::default()
            .with_user(POSTGRES_USER)
            .with_password(POSTGRES_PASSWORD)
            .with_db_name(POSTGRES_DB)
            .with_tag(POSTGRES_TAG.as_str())
            .start()
            .await?;

        let config = TestDatabaseConfig {
            host: container.get_host().await?.to_string(),
            port: container.get_host_port_ipv4(5432).await?,
            ..TestDatabaseConfig::default()
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.connection_url())
            .await?;

        let test_db = Self {
            _container: container,
            config,
            pool,
        };
        test_db.init_schema().await?;
        Ok(test_db)
    }

    async fn init_schema(&self) -> Result<(), BoxError> {
        let schema = include_str!("../../../migrations/20240101_000001_ledger_schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a party row so entries can reference it
    pub async fn insert_party(&self, name: &str, kind: &str) -> Result<PartyId, BoxError> {
        let id = PartyId::new();
        sqlx::query("INSERT INTO parties (id, name, kind) VALUES ($1, $2, $3)")
            .bind(Uuid::from(id))
            .bind(name)
            .bind(kind)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// Removes all rows while keeping the schema
    pub async fn clear_data(&self) -> Result<(), BoxError> {
        for table in ["opening_balances", "ledger_entries", "parties"] {
            sqlx::query(&format!("TRUNCATE TABLE {} CASCADE", table))
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}

static SHARED_TEST_DB: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// Shared container for tests that tolerate each other's rows
///
/// # Panics
///
/// Panics if the database fails to start
pub async fn get_shared_test_database() -> Arc<TestDatabase> {
    SHARED_TEST_DB
        .get_or_init(|| async {
            Arc::new(
                TestDatabase::new()
                    .await
                    .expect("Failed to create shared test database"),
            )
        })
        .await
        .clone()
}

/// Fresh container for a single test
pub async fn create_isolated_test_database() -> Result<TestDatabase, BoxError> {
    TestDatabase::new().await
}
