//! Test Utilities Crate
//!
//! Shared fixtures and helpers for the rice mill ledger test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built amounts, dates and entry histories
//! - `builders`: Builders for entries and ordered histories
//! - `database`: PostgreSQL test container management
//! - `assertions`: Running-balance and statement assertions
//! - `generators`: Proptest strategies for ledger inputs

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
