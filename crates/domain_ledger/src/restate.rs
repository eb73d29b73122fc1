//! Recomputing a scope after an entry is amended
//!
//! Balances are never stored, so an amendment cannot leave a stale chain
//! behind. What callers still want is to see what moved: every row from the
//! earliest affected position onward, and the closing balance before and
//! after.

use serde::Serialize;
use tracing::debug;

use core_kernel::Money;

use crate::entry::LedgerEntry;
use crate::error::{LedgerError, ValidationFailure};
use crate::ledger::{compute_scoped_ledger, LedgerSnapshot};
use crate::order::sort_entries;
use crate::scope::Scope;

/// Result of replacing one entry in a scope's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Restatement {
    /// The entry as it now stands
    pub entry: LedgerEntry,
    /// The entry as it stood before
    pub previous: LedgerEntry,
    /// Change in the entry's net effect
    pub delta: Money,
    pub closing_before: Money,
    pub closing_after: Money,
    /// Recomputed rows from the earliest affected position to the end
    pub downstream: Vec<LedgerSnapshot>,
}

impl Restatement {
    /// Returns true if the amendment left every balance where it was
    pub fn is_balance_neutral(&self) -> bool {
        self.delta.is_zero() && self.previous.order_key() == self.entry.order_key()
    }
}

/// Replaces `amended` in `history` and refolds the scope from `base`
///
/// # Errors
///
/// * `NotFound` if no entry in `history` has the amended entry's id
/// * `Validation` if the amendment moves the entry to another scope or book,
///   or if either fold fails
pub fn restate(
    scope: Scope,
    mut history: Vec<LedgerEntry>,
    amended: LedgerEntry,
    base: Money,
) -> Result<Restatement, LedgerError> {
    let position = history
        .iter()
        .position(|e| e.id == amended.id)
        .ok_or_else(|| LedgerError::not_found("LedgerEntry", amended.id))?;

    if amended.scope != scope {
        return Err(ValidationFailure::ScopeMismatch {
            entry_id: amended.id,
            expected: scope,
            found: amended.scope,
        }
        .into());
    }
    if amended.book != history[position].book {
        return Err(ValidationFailure::UnsupportedScope(format!(
            "entry {} cannot move from the {} book to the {} book",
            amended.id, history[position].book, amended.book
        ))
        .into());
    }

    sort_entries(&mut history);
    let closing_before = closing(&compute_scoped_ledger(scope, &history, base)?, base);

    let previous = match history.iter_mut().find(|e| e.id == amended.id) {
        Some(slot) => std::mem::replace(slot, amended.clone()),
        None => return Err(LedgerError::not_found("LedgerEntry", amended.id)),
    };
    sort_entries(&mut history);
    let rows = compute_scoped_ledger(scope, &history, base)?;
    let closing_after = closing(&rows, base);

    let from = previous.order_key().min(amended.order_key());
    let downstream: Vec<_> = rows
        .into_iter()
        .filter(|row| row.entry.order_key() >= from)
        .collect();

    let delta = amended.net()?.checked_sub(&previous.net()?)?;

    debug!(
        entry_id = %amended.id,
        scope = %scope,
        delta = %delta,
        downstream = downstream.len(),
        "ledger restated"
    );

    Ok(Restatement {
        entry: amended,
        previous,
        delta,
        closing_before,
        closing_after,
        downstream,
    })
}

fn closing(rows: &[LedgerSnapshot], opening: Money) -> Money {
    rows.last().map_or(opening, |r| r.balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Book, EntryAmendment};
    use chrono::NaiveDate;
    use core_kernel::{Currency, EntryId, PartyId};
    use rust_decimal_macros::dec;

    fn ngn(amount: i64) -> Money {
        Money::new(amount.into(), Currency::NGN)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn history(scope: Scope) -> Vec<LedgerEntry> {
        vec![
            LedgerEntry::new(Book::Sales, scope, date(1), Currency::NGN)
                .with_sequence(1)
                .with_debit(ngn(5000)),
            LedgerEntry::new(Book::Sales, scope, date(2), Currency::NGN)
                .with_sequence(2)
                .with_credit(ngn(2000)),
            LedgerEntry::new(Book::Sales, scope, date(3), Currency::NGN)
                .with_sequence(3)
                .with_debit(ngn(1000)),
        ]
    }

    #[test]
    fn test_amount_change_shifts_chain_by_delta() {
        let scope = Scope::Party(PartyId::new());
        let entries = history(scope);
        let amended = EntryAmendment {
            debit: Some(ngn(5500)),
            ..Default::default()
        }
        .apply(&entries[0]);

        let restated = restate(scope, entries, amended, ngn(10000)).unwrap();

        assert_eq!(restated.delta.amount(), dec!(500));
        assert_eq!(restated.closing_before.amount(), dec!(14000));
        assert_eq!(restated.closing_after.amount(), dec!(14500));
        let balances: Vec<_> = restated.downstream.iter().map(|r| r.balance.amount()).collect();
        assert_eq!(balances, vec![dec!(15500), dec!(13500), dec!(14500)]);
    }

    #[test]
    fn test_moving_entry_later_restates_from_old_position() {
        let scope = Scope::Party(PartyId::new());
        let entries = history(scope);
        let amended = EntryAmendment {
            date: Some(date(4)),
            ..Default::default()
        }
        .apply(&entries[1]);

        let restated = restate(scope, entries, amended, ngn(0)).unwrap();

        assert!(restated.delta.is_zero());
        assert_eq!(restated.downstream.len(), 2);
        assert_eq!(restated.downstream[0].balance.amount(), dec!(6000));
        assert_eq!(restated.downstream[1].balance.amount(), dec!(4000));
        assert_eq!(restated.closing_after, restated.closing_before);
        assert!(!restated.is_balance_neutral());
    }

    #[test]
    fn test_unknown_entry_is_not_found() {
        let scope = Scope::Party(PartyId::new());
        let stranger = LedgerEntry::new(Book::Sales, scope, date(1), Currency::NGN)
            .with_id(EntryId::new());

        let result = restate(scope, history(scope), stranger, ngn(0));
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[test]
    fn test_book_change_rejected() {
        let scope = Scope::Party(PartyId::new());
        let entries = history(scope);
        let mut amended = entries[0].clone();
        amended.book = Book::RicePurchase;

        let result = restate(scope, entries, amended, ngn(0));
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }
}
