//! Test Data Builders
//!
//! Builders for ledger entries and histories. Tests name only the fields
//! that matter to them; everything else gets a sensible default.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use core_kernel::{Currency, EntryId, Money, PartyId};
use domain_ledger::{Book, EntryDetails, LedgerEntry, NewEntry, Scope};

use crate::fixtures::DateFixtures;

/// Builder for a single ledger entry
#[derive(Debug, Clone)]
pub struct LedgerEntryBuilder {
    id: EntryId,
    book: Book,
    scope: Scope,
    date: NaiveDate,
    sequence: u64,
    currency: Currency,
    debit: Decimal,
    credit: Decimal,
    details: EntryDetails,
}

impl Default for LedgerEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerEntryBuilder {
    /// A zero cash voucher dated Jan 1 2024
    pub fn new() -> Self {
        Self {
            id: EntryId::new_v7(),
            book: Book::Cash,
            scope: Scope::Company,
            date: DateFixtures::jan(1),
            sequence: 1,
            currency: Currency::NGN,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            details: EntryDetails::default(),
        }
    }

    /// A sales ledger entry for `party`
    pub fn sale(party: PartyId) -> Self {
        Self::new().book(Book::Sales).scope(Scope::Party(party))
    }

    /// A rice purchase ledger entry for `party`
    pub fn purchase(party: PartyId) -> Self {
        Self::new()
            .book(Book::RicePurchase)
            .scope(Scope::Party(party))
    }

    pub fn id(mut self, id: EntryId) -> Self {
        self.id = id;
        self
    }

    pub fn book(mut self, book: Book) -> Self {
        self.book = book;
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Debit in major units
    pub fn debit(mut self, amount: impl Into<Decimal>) -> Self {
        self.debit = amount.into();
        self
    }

    /// Credit in major units
    pub fn credit(mut self, amount: impl Into<Decimal>) -> Self {
        self.credit = amount.into();
        self
    }

    pub fn invoice(mut self, invoice_no: impl Into<String>) -> Self {
        self.details.invoice_no = Some(invoice_no.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.details.description = Some(description.into());
        self
    }

    pub fn head(mut self, head: impl Into<String>) -> Self {
        self.details.head = Some(head.into());
        self
    }

    pub fn party_name(mut self, name: impl Into<String>) -> Self {
        self.details.party_name = Some(name.into());
        self
    }

    pub fn build(self) -> LedgerEntry {
        LedgerEntry::new(self.book, self.scope, self.date, self.currency)
            .with_id(self.id)
            .with_sequence(self.sequence)
            .with_debit(Money::new(self.debit, self.currency))
            .with_credit(Money::new(self.credit, self.currency))
            .with_details(self.details)
    }

    /// The same data as a record request, without id or sequence
    pub fn build_new(self) -> NewEntry {
        NewEntry {
            book: self.book,
            scope: self.scope,
            date: self.date,
            debit: Money::new(self.debit, self.currency),
            credit: Money::new(self.credit, self.currency),
            details: self.details,
        }
    }
}

/// Builder for an ordered history within one scope
///
/// Sequences are assigned in push order, so the result is already in
/// canonical order as long as dates do not go backwards.
#[derive(Debug, Clone)]
pub struct LedgerHistoryBuilder {
    book: Book,
    scope: Scope,
    start: NaiveDate,
    entries: Vec<LedgerEntry>,
}

impl LedgerHistoryBuilder {
    pub fn new(book: Book, scope: Scope) -> Self {
        Self {
            book,
            scope,
            start: DateFixtures::jan(1),
            entries: Vec::new(),
        }
    }

    pub fn sales(party: PartyId) -> Self {
        Self::new(Book::Sales, Scope::Party(party))
    }

    pub fn cash() -> Self {
        Self::new(Book::Cash, Scope::Company)
    }

    /// Day offsets passed to `entry` count from this date
    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    /// Adds an entry `day_offset` days after the start date
    pub fn entry(self, day_offset: u64, debit: i64, credit: i64) -> Self {
        self.entry_with(day_offset, debit, credit, |b| b)
    }

    /// Adds an entry and lets the caller adjust it before it is built
    pub fn entry_with(
        mut self,
        day_offset: u64,
        debit: i64,
        credit: i64,
        adjust: impl FnOnce(LedgerEntryBuilder) -> LedgerEntryBuilder,
    ) -> Self {
        let date = self
            .start
            .checked_add_days(Days::new(day_offset))
            .expect("date within range");
        let builder = LedgerEntryBuilder::new()
            .book(self.book)
            .scope(self.scope)
            .on(date)
            .sequence(self.entries.len() as u64 + 1)
            .debit(debit)
            .credit(credit);
        self.entries.push(adjust(builder).build());
        self
    }

    pub fn build(self) -> Vec<LedgerEntry> {
        self.entries
    }
}
