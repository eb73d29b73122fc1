//! Request and response bodies

pub mod ledger;

pub use ledger::*;
