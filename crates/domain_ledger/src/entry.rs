//! Ledger entries
//!
//! An entry is a dated debit and/or credit against one scope in one book.
//! Debits raise the running balance, credits lower it. Descriptive fields
//! ride along for display and search and never take part in balance math.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, EntryId, Money, MoneyError};

use crate::error::ValidationFailure;
use crate::order::OrderKey;
use crate::scope::Scope;

/// The book an entry is posted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Book {
    /// Sales invoices (debit) and customer receipts (credit), per customer
    Sales,
    /// Rice purchases (debit) and supplier payments (credit), per supplier
    RicePurchase,
    /// Company vouchers against income, expense and bank heads
    Cash,
}

impl Book {
    pub fn as_str(&self) -> &'static str {
        match self {
            Book::Sales => "sales",
            Book::RicePurchase => "rice_purchase",
            Book::Cash => "cash",
        }
    }

    /// Returns true if the book is kept per party rather than company-wide
    pub fn is_party_book(&self) -> bool {
        matches!(self, Book::Sales | Book::RicePurchase)
    }

    /// Checks that a scope is meaningful for this book
    pub fn accepts(&self, scope: &Scope) -> Result<(), ValidationFailure> {
        match (self.is_party_book(), scope) {
            (true, Scope::Party(_)) | (false, Scope::Company) => Ok(()),
            (true, Scope::Company) => Err(ValidationFailure::UnsupportedScope(format!(
                "{} ledger is kept per party",
                self
            ))),
            (false, Scope::Party(_)) => Err(ValidationFailure::UnsupportedScope(format!(
                "{} book is company-wide",
                self
            ))),
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Book {
    type Err = ValidationFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(Book::Sales),
            "rice_purchase" => Ok(Book::RicePurchase),
            "cash" => Ok(Book::Cash),
            other => Err(ValidationFailure::UnsupportedScope(format!(
                "unknown book '{}'",
                other
            ))),
        }
    }
}

/// Side of an entry an amount sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSide {
    Debit,
    Credit,
}

impl fmt::Display for AmountSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountSide::Debit => f.write_str("debit"),
            AmountSide::Credit => f.write_str("credit"),
        }
    }
}

/// Descriptive fields carried through the fold unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetails {
    /// Invoice or voucher number
    pub invoice_no: Option<String>,
    /// Free-text narration
    pub description: Option<String>,
    /// Income/expense/bank head name
    pub head: Option<String>,
    /// Counterparty display name
    pub party_name: Option<String>,
}

impl EntryDetails {
    /// Iterates over the populated searchable fields
    pub fn searchable(&self) -> impl Iterator<Item = &str> {
        [
            self.invoice_no.as_deref(),
            self.description.as_deref(),
            self.head.as_deref(),
            self.party_name.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// A single persisted ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier
    pub id: EntryId,
    /// Calendar date of the entry
    pub date: NaiveDate,
    /// Tie-break within a date, assigned at insert
    pub sequence: u64,
    /// Party or company the entry belongs to
    pub scope: Scope,
    /// Book the entry is posted to
    pub book: Book,
    /// Amount raising the balance
    pub debit: Money,
    /// Amount lowering the balance
    pub credit: Money,
    /// Display-only fields
    pub details: EntryDetails,
}

impl LedgerEntry {
    /// Creates a no-op entry; amounts are set with the `with_*` builders
    pub fn new(book: Book, scope: Scope, date: NaiveDate, currency: Currency) -> Self {
        Self {
            id: EntryId::new_v7(),
            date,
            sequence: 0,
            scope,
            book,
            debit: Money::zero(currency),
            credit: Money::zero(currency),
            details: EntryDetails::default(),
        }
    }

    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = id;
        self
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_debit(mut self, amount: Money) -> Self {
        self.debit = amount;
        self
    }

    pub fn with_credit(mut self, amount: Money) -> Self {
        self.credit = amount;
        self
    }

    pub fn with_details(mut self, details: EntryDetails) -> Self {
        self.details = details;
        self
    }

    pub fn with_invoice_no(mut self, invoice_no: impl Into<String>) -> Self {
        self.details.invoice_no = Some(invoice_no.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.details.description = Some(description.into());
        self
    }

    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.details.head = Some(head.into());
        self
    }

    pub fn with_party_name(mut self, name: impl Into<String>) -> Self {
        self.details.party_name = Some(name.into());
        self
    }

    /// The key entries are ordered by within a scope
    pub fn order_key(&self) -> OrderKey {
        OrderKey {
            date: self.date,
            sequence: self.sequence,
        }
    }

    /// Currency of the entry's amounts
    pub fn currency(&self) -> Currency {
        self.debit.currency()
    }

    /// Net effect on the balance: debit minus credit
    pub fn net(&self) -> Result<Money, MoneyError> {
        self.debit.checked_sub(&self.credit)
    }

    /// Checks amount invariants against the ledger currency
    pub fn validate_amounts(&self, currency: Currency) -> Result<(), ValidationFailure> {
        for (side, amount) in [(AmountSide::Debit, &self.debit), (AmountSide::Credit, &self.credit)] {
            if amount.currency() != currency {
                return Err(ValidationFailure::CurrencyMismatch {
                    entry_id: self.id,
                    expected: currency,
                    found: amount.currency(),
                });
            }
            if amount.is_negative() {
                return Err(ValidationFailure::NegativeAmount {
                    entry_id: self.id,
                    side,
                    amount: amount.amount(),
                });
            }
        }
        Ok(())
    }
}

/// A request to record an entry; id and sequence are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub book: Book,
    pub scope: Scope,
    pub date: NaiveDate,
    pub debit: Money,
    pub credit: Money,
    pub details: EntryDetails,
}

impl NewEntry {
    /// Materializes the entry with store-assigned identity
    pub fn into_entry(self, id: EntryId, sequence: u64) -> LedgerEntry {
        LedgerEntry {
            id,
            date: self.date,
            sequence,
            scope: self.scope,
            book: self.book,
            debit: self.debit,
            credit: self.credit,
            details: self.details,
        }
    }

    /// Checks the request before it reaches a store
    pub fn validate(&self, currency: Currency) -> Result<(), ValidationFailure> {
        self.book.accepts(&self.scope)?;
        self.clone()
            .into_entry(EntryId::new(), 0)
            .validate_amounts(currency)
    }
}

/// Field changes applied to an existing entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAmendment {
    pub date: Option<NaiveDate>,
    pub debit: Option<Money>,
    pub credit: Option<Money>,
    pub details: Option<EntryDetails>,
}

impl EntryAmendment {
    /// Returns a copy of the entry with the changes applied; identity, scope,
    /// book and sequence are preserved
    pub fn apply(&self, entry: &LedgerEntry) -> LedgerEntry {
        let mut amended = entry.clone();
        if let Some(date) = self.date {
            amended.date = date;
        }
        if let Some(debit) = self.debit {
            amended.debit = debit;
        }
        if let Some(credit) = self.credit {
            amended.credit = credit;
        }
        if let Some(details) = &self.details {
            amended.details = details.clone();
        }
        amended
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.debit.is_none() && self.credit.is_none() && self.details.is_none()
    }
}
