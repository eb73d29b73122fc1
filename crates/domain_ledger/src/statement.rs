//! Windowed ledger statements
//!
//! A statement folds one scope's entries inside a date window. The opening
//! balance of the window is derived from everything strictly before the
//! window start, never from the first visible row and never defaulted to
//! zero, so a filtered window closes on the same figure as full history.

use serde::Serialize;
use tracing::debug;

use core_kernel::{Currency, DateRange, Money};

use crate::entry::LedgerEntry;
use crate::error::LedgerError;
use crate::ledger::{compute_scoped_ledger, LedgerSnapshot, RunningBalance};
use crate::order::{ensure_sorted, sort_entries};
use crate::scope::Scope;
use crate::search::{visible_rows, SearchFilter};

/// Where a window's opening balance comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningBalance {
    /// Use this figure as-is and ignore history before the window
    Supplied(Money),
    /// Start from `base` and fold every entry dated before the window
    FromHistory { base: Money },
}

impl OpeningBalance {
    pub fn currency(&self) -> Currency {
        match self {
            OpeningBalance::Supplied(m) => m.currency(),
            OpeningBalance::FromHistory { base } => base.currency(),
        }
    }
}

/// Opening, closing and totals for one scope over one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStatement {
    pub scope: Scope,
    pub range: DateRange,
    pub opening_balance: Money,
    pub closing_balance: Money,
    pub total_debit: Money,
    pub total_credit: Money,
    pub rows: Vec<LedgerSnapshot>,
}

impl LedgerStatement {
    /// Builds a statement from a scope's history
    ///
    /// `history` may arrive in any order and may extend past the window on
    /// either side; it is put into canonical order first. Entries after the
    /// window are ignored.
    ///
    /// # Errors
    ///
    /// Validation errors from the fold, including an entry from another scope.
    pub fn build(
        scope: Scope,
        mut history: Vec<LedgerEntry>,
        range: DateRange,
        opening: OpeningBalance,
    ) -> Result<Self, LedgerError> {
        sort_entries(&mut history);
        ensure_sorted(&history)?;

        let (before, window): (Vec<_>, Vec<_>) = history
            .into_iter()
            .filter(|e| e.date <= range.end())
            .partition(|e| range.precedes(e.date));

        let opening_balance = match opening {
            OpeningBalance::Supplied(amount) => amount,
            OpeningBalance::FromHistory { base } => {
                let mut carried = RunningBalance::new(before, base).scoped(scope);
                for step in carried.by_ref() {
                    step?;
                }
                carried.balance()
            }
        };

        let rows = compute_scoped_ledger(scope, &window, opening_balance)?;
        Self::from_rows(scope, range, opening_balance, rows)
    }

    /// Assembles a statement from already-folded rows
    pub fn from_rows(
        scope: Scope,
        range: DateRange,
        opening_balance: Money,
        rows: Vec<LedgerSnapshot>,
    ) -> Result<Self, LedgerError> {
        let currency = opening_balance.currency();
        let total_debit = Money::checked_sum(rows.iter().map(|r| &r.entry.debit), currency)?;
        let total_credit = Money::checked_sum(rows.iter().map(|r| &r.entry.credit), currency)?;
        let closing_balance = rows.last().map_or(opening_balance, |r| r.balance);

        debug!(
            scope = %scope,
            rows = rows.len(),
            opening = %opening_balance,
            closing = %closing_balance,
            "statement built"
        );

        Ok(Self {
            scope,
            range,
            opening_balance,
            closing_balance,
            total_debit,
            total_credit,
            rows,
        })
    }

    pub fn currency(&self) -> Currency {
        self.opening_balance.currency()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows to display for a search; balances and totals are not recomputed
    pub fn visible(&self, filter: Option<&SearchFilter>) -> Vec<&LedgerSnapshot> {
        visible_rows(&self.rows, filter)
    }
}
