//! Ledger application service
//!
//! Composes a [`LedgerPort`] with the pure engine. Every read fetches the
//! scope's history, derives the window's opening balance from it and folds;
//! nothing computed here is cached or written back.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, instrument};

use core_kernel::{Currency, DateRange, EntryId, OperationMetadata, PartyId};

use crate::entry::{Book, EntryAmendment, LedgerEntry, NewEntry};
use crate::error::{LedgerError, ValidationFailure};
use crate::ledger::LedgerSnapshot;
use crate::ports::{LedgerPort, LedgerPortExt};
use crate::report::{DailyReport, FinancialStatement};
use crate::restate::{restate, Restatement};
use crate::scope::Scope;
use crate::search::SearchFilter;
use crate::statement::{LedgerStatement, OpeningBalance};

/// A party statement together with the search that narrows its display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerView {
    pub statement: LedgerStatement,
    pub filter: Option<SearchFilter>,
}

impl LedgerView {
    /// Rows to show; balances are those of the unfiltered fold
    pub fn rows(&self) -> Vec<&LedgerSnapshot> {
        self.statement.visible(self.filter.as_ref())
    }
}

/// Service for reading and writing ledgers
pub struct LedgerService<P: LedgerPort + ?Sized> {
    port: Arc<P>,
    currency: Currency,
}

impl<P: LedgerPort + ?Sized> Clone for LedgerService<P> {
    fn clone(&self) -> Self {
        Self {
            port: Arc::clone(&self.port),
            currency: self.currency,
        }
    }
}

impl<P: LedgerPort + ?Sized> LedgerService<P> {
    pub fn new(port: Arc<P>, currency: Currency) -> Self {
        Self { port, currency }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn port(&self) -> &Arc<P> {
        &self.port
    }

    /// Statement for one customer or supplier over a date window
    ///
    /// # Errors
    ///
    /// * `Validation` if `book` is not kept per party, or stored entries
    ///   break an invariant of the fold
    /// * `NotFound` if the party does not exist
    /// * `Transport` if the store could not be read
    #[instrument(skip(self, search, metadata), fields(book = %book, party_id = %party))]
    pub async fn party_ledger(
        &self,
        book: Book,
        party: PartyId,
        range: DateRange,
        search: Option<&str>,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerView, LedgerError> {
        let scope = Scope::Party(party);
        book.accepts(&scope)?;
        self.port.require_scope(scope, metadata.clone()).await?;

        let statement = self.statement(book, scope, range, metadata).await?;
        Ok(LedgerView {
            statement,
            filter: search.and_then(SearchFilter::new),
        })
    }

    /// Cash book for a single day
    #[instrument(skip(self, metadata))]
    pub async fn daily_report(
        &self,
        day: NaiveDate,
        metadata: Option<OperationMetadata>,
    ) -> Result<DailyReport, LedgerError> {
        let (history, opening) = self
            .history(Book::Cash, Scope::Company, day, metadata)
            .await?;
        DailyReport::build(history, day, opening)
            .map_err(|e| log_integrity(e, Book::Cash, Scope::Company))
    }

    /// Cash book over a period, broken down by head
    #[instrument(skip(self, metadata), fields(from = %range.start(), to = %range.end()))]
    pub async fn financial_statement(
        &self,
        range: DateRange,
        metadata: Option<OperationMetadata>,
    ) -> Result<FinancialStatement, LedgerError> {
        let (history, opening) = self
            .history(Book::Cash, Scope::Company, range.end(), metadata)
            .await?;
        FinancialStatement::build(history, range, opening)
            .map_err(|e| log_integrity(e, Book::Cash, Scope::Company))
    }

    /// Records a new entry after checking it against the ledger currency
    #[instrument(skip(self, entry, metadata), fields(book = %entry.book, scope = %entry.scope))]
    pub async fn record(
        &self,
        entry: NewEntry,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntry, LedgerError> {
        entry.validate(self.currency)?;
        let stored = self.port.record_entry(entry, metadata).await?;
        info!(entry_id = %stored.id, sequence = stored.sequence, "ledger entry recorded");
        Ok(stored)
    }

    /// Amends an entry and returns the recomputed chain after it
    ///
    /// The restatement is computed before anything is written, so an
    /// amendment that would break the fold is rejected without side effects.
    #[instrument(skip(self, amendment, metadata), fields(entry_id = %id))]
    pub async fn amend(
        &self,
        id: EntryId,
        amendment: EntryAmendment,
        metadata: Option<OperationMetadata>,
    ) -> Result<Restatement, LedgerError> {
        if amendment.is_empty() {
            return Err(ValidationFailure::Amount("amendment changes nothing".to_string()).into());
        }

        let existing = self.port.get_entry(id, metadata.clone()).await?;
        let amended = amendment.apply(&existing);
        amended.validate_amounts(self.currency)?;

        let history = self
            .port
            .entries_for_scope(existing.book, existing.scope, NaiveDate::MAX, metadata.clone())
            .await?;
        let base = self
            .port
            .base_balance_or_zero(existing.book, existing.scope, self.currency, metadata.clone())
            .await?;

        let restatement = restate(existing.scope, history, amended, base)
            .map_err(|e| log_integrity(e, existing.book, existing.scope))?;
        self.port
            .amend_entry(restatement.entry.clone(), metadata)
            .await?;

        info!(
            delta = %restatement.delta,
            closing_before = %restatement.closing_before,
            closing_after = %restatement.closing_after,
            "ledger entry amended"
        );
        Ok(restatement)
    }

    async fn statement(
        &self,
        book: Book,
        scope: Scope,
        range: DateRange,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerStatement, LedgerError> {
        let (history, opening) = self.history(book, scope, range.end(), metadata).await?;
        LedgerStatement::build(scope, history, range, opening)
            .map_err(|e| log_integrity(e, book, scope))
    }

    async fn history(
        &self,
        book: Book,
        scope: Scope,
        until: NaiveDate,
        metadata: Option<OperationMetadata>,
    ) -> Result<(Vec<LedgerEntry>, OpeningBalance), LedgerError> {
        let history = self
            .port
            .entries_for_scope(book, scope, until, metadata.clone())
            .await?;
        let base = self
            .port
            .base_balance_or_zero(book, scope, self.currency, metadata)
            .await?;
        Ok((history, OpeningBalance::FromHistory { base }))
    }
}

/// Stored data that fails the fold is a data-integrity bug, not bad input
fn log_integrity(err: LedgerError, book: Book, scope: Scope) -> LedgerError {
    if err.is_validation() {
        error!(book = %book, scope = %scope, error = %err, "ledger data failed validation");
    }
    err
}
