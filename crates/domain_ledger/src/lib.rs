//! Ledger Balance Engine
//!
//! This crate computes running balances for the rice mill's books: the sales
//! ledger and rice purchase ledger (one account per customer or supplier) and
//! the company cash book behind the daily report and financial statement.
//!
//! # Model
//!
//! - **Entry**: a dated debit and/or credit in one book and one scope
//! - **Scope**: a single party, or the company as a whole
//! - **Order**: `(date, sequence)`, where the sequence is assigned at insert
//! - **Snapshot**: an entry paired with the balance after applying it
//!
//! Balances are never stored. Every statement is derived from the ordered
//! entries of one scope, with the opening balance of a window computed from
//! everything before it.
//!
//! # Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use core_kernel::{Currency, Money, PartyId};
//! use domain_ledger::{compute_ledger, Book, LedgerEntry, Scope};
//! use rust_decimal_macros::dec;
//!
//! let scope = Scope::Party(PartyId::new());
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let ngn = |amount| Money::new(amount, Currency::NGN);
//!
//! let entries = vec![
//!     LedgerEntry::new(Book::Sales, scope, day(1), Currency::NGN)
//!         .with_sequence(1)
//!         .with_debit(ngn(dec!(5000))),
//!     LedgerEntry::new(Book::Sales, scope, day(2), Currency::NGN)
//!         .with_sequence(2)
//!         .with_credit(ngn(dec!(2000))),
//! ];
//!
//! let rows = compute_ledger(&entries, ngn(dec!(10000))).unwrap();
//! assert_eq!(rows[0].balance.amount(), dec!(15000));
//! assert_eq!(rows[1].balance.amount(), dec!(13000));
//! ```

pub mod entry;
pub mod error;
pub mod generation;
pub mod ledger;
pub mod order;
pub mod ports;
pub mod report;
pub mod restate;
pub mod scope;
pub mod search;
pub mod service;
pub mod statement;

pub use entry::{AmountSide, Book, EntryAmendment, EntryDetails, LedgerEntry, NewEntry};
pub use error::{LedgerError, ValidationFailure};
pub use generation::{Generation, InFlight, RequestGenerations};
pub use ledger::{compute_ledger, compute_scoped_ledger, LedgerSnapshot, RunningBalance};
pub use order::{ensure_sorted, sort_entries, OrderKey};
pub use ports::{LedgerPort, LedgerPortExt};
pub use report::{summarize_by_head, DailyReport, DayClose, FinancialStatement, HeadSummary, UNASSIGNED_HEAD};
pub use restate::{restate, Restatement};
pub use scope::{fold_each_scope, partition_by_scope, Scope};
pub use search::{visible_rows, SearchFilter};
pub use service::{LedgerService, LedgerView};
pub use statement::{LedgerStatement, OpeningBalance};
