//! Infrastructure database layer
//!
//! PostgreSQL persistence for the ledger using SQLx: connection pooling,
//! migrations, a row-level repository and the `LedgerPort` adapter.
//!
//! Only entries, parties and carried-in opening balances are stored.
//! Running balances are always recomputed from history.
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresLedgerAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/ricemill")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresLedgerAdapter::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresLedgerAdapter;
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::LedgerRepository;
