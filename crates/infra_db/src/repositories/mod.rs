//! Repository implementations
//!
//! Repositories speak rows and SQL; domain conversion lives in `adapters`.

pub mod ledger;

pub use ledger::{EntryRow, EntryValues, LedgerRepository, OpeningBalanceRow};
