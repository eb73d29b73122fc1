//! Ledger domain errors
//!
//! Three failure classes reach a caller: the input broke an invariant of the
//! fold (`Validation`), the requested scope or entry does not exist
//! (`NotFound`), or fetching the entries failed (`Transport`). Only the last
//! is worth retrying.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{Currency, EntryId, MoneyError, PortError, TemporalError};

use crate::entry::AmountSide;
use crate::scope::Scope;

/// Which invariant a ledger input violated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// Entries are not in `(date, sequence)` order
    #[error(
        "entries must be pre-sorted: entry {entry_id} at position {position} \
         ({date}, seq {sequence}) comes after ({previous_date}, seq {previous_sequence})"
    )]
    Unsorted {
        position: usize,
        entry_id: EntryId,
        date: NaiveDate,
        sequence: u64,
        previous_date: NaiveDate,
        previous_sequence: u64,
    },

    /// Two entries share the same ordering key, so the order is not total
    #[error("entries {first} and {second} share ordering key ({date}, seq {sequence})")]
    DuplicateOrderKey {
        first: EntryId,
        second: EntryId,
        date: NaiveDate,
        sequence: u64,
    },

    /// A debit or credit below zero
    #[error("negative {side} amount {amount} on entry {entry_id}")]
    NegativeAmount {
        entry_id: EntryId,
        side: AmountSide,
        amount: Decimal,
    },

    /// An entry amount in a different currency from the ledger
    #[error("entry {entry_id} is in {found}, ledger is in {expected}")]
    CurrencyMismatch {
        entry_id: EntryId,
        expected: Currency,
        found: Currency,
    },

    /// An entry from another scope reached a scoped fold
    #[error("entry {entry_id} belongs to scope {found}, ledger scope is {expected}")]
    ScopeMismatch {
        entry_id: EntryId,
        expected: Scope,
        found: Scope,
    },

    /// The book does not support the requested scope
    #[error("{0}")]
    UnsupportedScope(String),

    /// A malformed or non-finite amount
    #[error("invalid amount: {0}")]
    Amount(String),

    /// A malformed date or inverted date window
    #[error("invalid date range: {0}")]
    DateRange(String),

    /// Running balance left the representable range
    #[error("balance overflow at entry {0}")]
    Overflow(EntryId),
}

/// Errors surfaced by the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed or unsorted input to the fold
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationFailure),

    /// Requested scope, party or entry does not exist
    #[error("Not found: {entity} {id}")]
    NotFound { entity: String, id: String },

    /// Fetching or storing entries failed
    #[error("Transport error: {0}")]
    Transport(#[source] PortError),
}

impl LedgerError {
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Returns true for data-integrity failures that should be logged loudly
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    /// Returns true if retrying the fetch might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            LedgerError::Transport(err) => err.is_transient(),
            _ => false,
        }
    }
}

impl From<PortError> for LedgerError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => LedgerError::NotFound {
                entity: entity_type,
                id,
            },
            PortError::Validation { message, .. } => {
                LedgerError::Validation(ValidationFailure::Amount(message))
            }
            other => LedgerError::Transport(other),
        }
    }
}

impl From<MoneyError> for LedgerError {
    fn from(err: MoneyError) -> Self {
        LedgerError::Validation(ValidationFailure::Amount(err.to_string()))
    }
}

impl From<TemporalError> for LedgerError {
    fn from(err: TemporalError) -> Self {
        LedgerError::Validation(ValidationFailure::DateRange(err.to_string()))
    }
}
