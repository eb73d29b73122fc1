//! Domain adapters
//!
//! Implementations of domain ports backed by PostgreSQL.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_ledger::LedgerPort;
//! use infra_db::PostgresLedgerAdapter;
//!
//! let port: Arc<dyn LedgerPort> = Arc::new(PostgresLedgerAdapter::new(pool));
//! ```

pub mod ledger;

pub use ledger::PostgresLedgerAdapter;
