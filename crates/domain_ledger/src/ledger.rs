//! Running-balance fold
//!
//! This module is the heart of the crate: a single left-to-right pass that
//! turns an ordered entry sequence and an opening balance into one snapshot
//! per entry.
//!
//! ```text
//! balance = opening
//! for entry in entries:
//!     balance = balance + entry.debit - entry.credit
//!     emit (entry, balance)
//! ```
//!
//! Two forms are provided. [`compute_ledger`] validates the whole sequence
//! before folding and returns either every snapshot or an error, never a
//! partial result. [`RunningBalance`] is a lazy iterator adapter for very
//! long histories; it validates each entry as it is pulled and stops after
//! the first error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::Money;

use crate::entry::LedgerEntry;
use crate::error::{LedgerError, ValidationFailure};
use crate::order::OrderChecker;
use crate::scope::Scope;

/// An entry together with the balance after applying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// The original entry, unchanged
    pub entry: LedgerEntry,
    /// Running balance after this entry
    pub balance: Money,
}

impl LedgerSnapshot {
    /// Balance before this entry: `balance - (debit - credit)`
    ///
    /// Only equals a window's true opening balance when this snapshot is the
    /// first one produced from complete history.
    pub fn implied_opening_balance(&self) -> Result<Money, LedgerError> {
        let net = self.entry.net()?;
        Ok(self.balance.checked_sub(&net)?)
    }
}

/// Computes the running balance for an ordered entry sequence
///
/// # Arguments
///
/// * `entries` - Entries sorted by `(date, sequence)`, strictly increasing
/// * `opening_balance` - Balance carried in before the first entry
///
/// # Errors
///
/// Returns `LedgerError::Validation` if the entries are unsorted, share an
/// ordering key, carry a negative amount or a currency different from the
/// opening balance. Nothing is emitted on error.
pub fn compute_ledger(
    entries: &[LedgerEntry],
    opening_balance: Money,
) -> Result<Vec<LedgerSnapshot>, LedgerError> {
    fold(None, entries, opening_balance)
}

/// Like [`compute_ledger`], additionally rejecting entries outside `scope`
pub fn compute_scoped_ledger(
    scope: Scope,
    entries: &[LedgerEntry],
    opening_balance: Money,
) -> Result<Vec<LedgerSnapshot>, LedgerError> {
    fold(Some(scope), entries, opening_balance)
}

fn fold(
    scope: Option<Scope>,
    entries: &[LedgerEntry],
    opening_balance: Money,
) -> Result<Vec<LedgerSnapshot>, LedgerError> {
    let currency = opening_balance.currency();
    let mut order = OrderChecker::default();
    for (position, entry) in entries.iter().enumerate() {
        validate_entry(scope, entry, currency)?;
        order.step(position, entry)?;
    }

    let mut balance = opening_balance;
    let mut snapshots = Vec::with_capacity(entries.len());
    for entry in entries {
        balance = apply(balance, entry)?;
        snapshots.push(LedgerSnapshot {
            entry: entry.clone(),
            balance,
        });
    }

    debug!(
        entries = snapshots.len(),
        opening = %opening_balance,
        closing = %balance,
        "ledger folded"
    );
    Ok(snapshots)
}

fn validate_entry(
    scope: Option<Scope>,
    entry: &LedgerEntry,
    currency: core_kernel::Currency,
) -> Result<(), ValidationFailure> {
    if let Some(expected) = scope {
        if entry.scope != expected {
            return Err(ValidationFailure::ScopeMismatch {
                entry_id: entry.id,
                expected,
                found: entry.scope,
            });
        }
    }
    entry.validate_amounts(currency)
}

fn apply(balance: Money, entry: &LedgerEntry) -> Result<Money, ValidationFailure> {
    balance
        .checked_add(&entry.debit)
        .and_then(|b| b.checked_sub(&entry.credit))
        .map_err(|_| ValidationFailure::Overflow(entry.id))
}

/// Lazy running-balance adapter over any entry iterator
///
/// ```rust,ignore
/// let closing = RunningBalance::new(rows_from_cursor, opening)
///     .try_fold(opening, |_, snapshot| snapshot.map(|s| s.balance))?;
/// ```
#[derive(Debug)]
pub struct RunningBalance<I> {
    entries: I,
    balance: Money,
    scope: Option<Scope>,
    order: OrderChecker,
    position: usize,
    failed: bool,
}

impl<I> RunningBalance<I>
where
    I: Iterator<Item = LedgerEntry>,
{
    pub fn new<T>(entries: T, opening_balance: Money) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            entries: entries.into_iter(),
            balance: opening_balance,
            scope: None,
            order: OrderChecker::default(),
            position: 0,
            failed: false,
        }
    }

    /// Restricts the fold to one scope
    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Balance after the last entry pulled so far
    pub fn balance(&self) -> Money {
        self.balance
    }

    fn advance(&mut self, entry: LedgerEntry) -> Result<LedgerSnapshot, LedgerError> {
        validate_entry(self.scope, &entry, self.balance.currency())?;
        self.order.step(self.position, &entry)?;
        self.balance = apply(self.balance, &entry)?;
        self.position += 1;
        Ok(LedgerSnapshot {
            entry,
            balance: self.balance,
        })
    }
}

impl<I> Iterator for RunningBalance<I>
where
    I: Iterator<Item = LedgerEntry>,
{
    type Item = Result<LedgerSnapshot, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let entry = self.entries.next()?;
        let result = self.advance(entry);
        self.failed = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            let (_, upper) = self.entries.size_hint();
            (0, upper)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Book;
    use chrono::NaiveDate;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn ngn(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::NGN)
    }

    fn entry(day: u32, debit: rust_decimal::Decimal, credit: rust_decimal::Decimal) -> LedgerEntry {
        LedgerEntry::new(
            Book::Cash,
            Scope::Company,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            Currency::NGN,
        )
        .with_sequence(day as u64)
        .with_debit(ngn(debit))
        .with_credit(ngn(credit))
    }

    #[test]
    fn test_empty_sequence_yields_nothing() {
        let snapshots = compute_ledger(&[], ngn(dec!(1000))).unwrap();
        assert!(snapshots.is_empty());
    }

    #[test]
    fn test_single_debit_raises_balance() {
        let snapshots = compute_ledger(&[entry(1, dec!(500), dec!(0))], ngn(dec!(1000))).unwrap();
        assert_eq!(snapshots[0].balance.amount(), dec!(1500));
    }

    #[test]
    fn test_single_credit_lowers_balance() {
        let snapshots = compute_ledger(&[entry(1, dec!(0), dec!(500))], ngn(dec!(1000))).unwrap();
        assert_eq!(snapshots[0].balance.amount(), dec!(500));
    }

    #[test]
    fn test_both_sides_net_out() {
        let snapshots =
            compute_ledger(&[entry(1, dec!(300), dec!(300))], ngn(dec!(-50))).unwrap();
        assert_eq!(snapshots[0].balance.amount(), dec!(-50));
    }

    #[test]
    fn test_unsorted_input_rejected_without_output() {
        let entries = vec![entry(2, dec!(10), dec!(0)), entry(1, dec!(10), dec!(0))];
        let result = compute_ledger(&entries, ngn(dec!(0)));

        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationFailure::Unsorted { position: 1, .. }))
        ));
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let foreign = entry(1, dec!(0), dec!(0)).with_debit(Money::new(dec!(5), Currency::USD));
        let result = compute_ledger(&[foreign], ngn(dec!(0)));

        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationFailure::CurrencyMismatch { .. }))
        ));
    }

    #[test]
    fn test_implied_opening_balance() {
        let snapshots = compute_ledger(&[entry(1, dec!(5000), dec!(0))], ngn(dec!(10000))).unwrap();
        assert_eq!(
            snapshots[0].implied_opening_balance().unwrap().amount(),
            dec!(10000)
        );
    }

    #[test]
    fn test_lazy_fold_stops_after_error() {
        let entries = vec![
            entry(1, dec!(10), dec!(0)),
            entry(3, dec!(10), dec!(0)),
            entry(2, dec!(10), dec!(0)),
            entry(4, dec!(10), dec!(0)),
        ];
        let results: Vec<_> = RunningBalance::new(entries, ngn(dec!(0))).collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(results[2].is_err());
    }

    #[test]
    fn test_lazy_fold_matches_eager_fold() {
        let entries = vec![
            entry(1, dec!(5000), dec!(0)),
            entry(2, dec!(0), dec!(2000)),
            entry(3, dec!(1000), dec!(0)),
        ];
        let eager = compute_ledger(&entries, ngn(dec!(10000))).unwrap();
        let lazy: Vec<_> = RunningBalance::new(entries, ngn(dec!(10000)))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(eager, lazy);
    }
}
