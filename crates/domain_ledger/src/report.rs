//! Company-wide reports over the cash book
//!
//! The daily report and the financial statement are both company-scope
//! statements with extra breakdowns. They reuse [`LedgerStatement`] for the
//! balance chain and only add grouping on top of the folded rows.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use core_kernel::{Currency, DateRange, Money};

use crate::entry::LedgerEntry;
use crate::error::LedgerError;
use crate::ledger::LedgerSnapshot;
use crate::scope::Scope;
use crate::statement::{LedgerStatement, OpeningBalance};

/// Label for entries posted without a head
pub const UNASSIGNED_HEAD: &str = "Unassigned";

/// Debit/credit totals for one head
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadSummary {
    pub head: String,
    pub total_debit: Money,
    pub total_credit: Money,
    /// `total_debit - total_credit`
    pub net: Money,
    pub entries: usize,
}

/// Groups folded rows by head, ordered by head name
pub fn summarize_by_head(
    rows: &[LedgerSnapshot],
    currency: Currency,
) -> Result<Vec<HeadSummary>, LedgerError> {
    let mut groups: BTreeMap<&str, Vec<&LedgerEntry>> = BTreeMap::new();
    for row in rows {
        let head = row.entry.details.head.as_deref().unwrap_or(UNASSIGNED_HEAD);
        groups.entry(head).or_default().push(&row.entry);
    }

    groups
        .into_iter()
        .map(|(head, entries)| -> Result<HeadSummary, LedgerError> {
            let total_debit = Money::checked_sum(entries.iter().map(|e| &e.debit), currency)?;
            let total_credit = Money::checked_sum(entries.iter().map(|e| &e.credit), currency)?;
            Ok(HeadSummary {
                head: head.to_string(),
                net: total_debit.checked_sub(&total_credit)?,
                total_debit,
                total_credit,
                entries: entries.len(),
            })
        })
        .collect()
}

/// One business day of the cash book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    pub day: NaiveDate,
    pub statement: LedgerStatement,
    pub heads: Vec<HeadSummary>,
}

impl DailyReport {
    /// Builds the report for `day` from company history up to that day
    pub fn build(
        history: Vec<LedgerEntry>,
        day: NaiveDate,
        opening: OpeningBalance,
    ) -> Result<Self, LedgerError> {
        let statement =
            LedgerStatement::build(Scope::Company, history, DateRange::single_day(day), opening)?;
        let heads = summarize_by_head(&statement.rows, statement.currency())?;
        Ok(Self {
            day,
            statement,
            heads,
        })
    }

    /// Receipts: rows on the credit side
    pub fn credits(&self) -> impl Iterator<Item = &LedgerSnapshot> {
        self.statement.rows.iter().filter(|r| !r.entry.credit.is_zero())
    }

    /// Payments: rows on the debit side
    pub fn debits(&self) -> impl Iterator<Item = &LedgerSnapshot> {
        self.statement.rows.iter().filter(|r| !r.entry.debit.is_zero())
    }
}

/// Closing balance at the end of a day that had activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayClose {
    pub day: NaiveDate,
    pub closing_balance: Money,
}

/// Company position over a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialStatement {
    pub statement: LedgerStatement,
    pub heads: Vec<HeadSummary>,
    pub day_closes: Vec<DayClose>,
}

impl FinancialStatement {
    pub fn build(
        history: Vec<LedgerEntry>,
        range: DateRange,
        opening: OpeningBalance,
    ) -> Result<Self, LedgerError> {
        let statement = LedgerStatement::build(Scope::Company, history, range, opening)?;
        let heads = summarize_by_head(&statement.rows, statement.currency())?;
        let day_closes = day_closes(&statement.rows);
        Ok(Self {
            statement,
            heads,
            day_closes,
        })
    }

    /// Net movement over the period
    pub fn net_movement(&self) -> Result<Money, LedgerError> {
        Ok(self
            .statement
            .closing_balance
            .checked_sub(&self.statement.opening_balance)?)
    }
}

/// Last balance of each date, in date order
fn day_closes(rows: &[LedgerSnapshot]) -> Vec<DayClose> {
    let mut closes: Vec<DayClose> = Vec::new();
    for row in rows {
        match closes.last_mut() {
            Some(last) if last.day == row.entry.date => last.closing_balance = row.balance,
            _ => closes.push(DayClose {
                day: row.entry.date,
                closing_balance: row.balance,
            }),
        }
    }
    closes
}
