//! Pre-built Test Fixtures
//!
//! Ready-made amounts, dates and entry histories for ledger tests. The
//! January scenario is the worked example every layer is checked against:
//! opening ₦10,000, then a sale, a receipt and another sale.

use chrono::NaiveDate;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money, PartyId};
use domain_ledger::{Book, LedgerEntry, Scope};

/// Heads a rice mill posts cash vouchers against
pub static CASH_HEADS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Paddy Sales",
        "Bran Sales",
        "Diesel",
        "Wages",
        "Bank Deposit",
        "Electricity",
    ]
});

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Naira amount in major units
    pub fn ngn(amount: impl Into<Decimal>) -> Money {
        Money::new(amount.into(), Currency::NGN)
    }

    pub fn ngn_zero() -> Money {
        Money::zero(Currency::NGN)
    }

    /// Opening balance of the January scenario
    pub fn opening_10000() -> Money {
        Money::new(dec!(10000.00), Currency::NGN)
    }

    /// A dollar amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }
}

/// Fixture for calendar dates
pub struct DateFixtures;

impl DateFixtures {
    /// A day in January 2024
    pub fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).expect("valid January date")
    }

    /// A day in February 2024
    pub fn feb(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).expect("valid February date")
    }
}

/// Fixture for descriptive text
pub struct TextFixtures;

impl TextFixtures {
    /// A random trading-company name
    pub fn party_name() -> String {
        CompanyName().fake()
    }

    /// A random one-line narration
    pub fn narration() -> String {
        Sentence(3..7).fake()
    }
}

/// Fixture histories
pub struct LedgerFixtures;

impl LedgerFixtures {
    /// Jan 1-3 sales ledger: (5000, 0), (0, 2000), (1000, 0)
    ///
    /// From an opening of ₦10,000 the balances are 15000, 13000, 14000.
    pub fn january_sales(party: PartyId) -> Vec<LedgerEntry> {
        let scope = Scope::Party(party);
        vec![
            LedgerEntry::new(Book::Sales, scope, DateFixtures::jan(1), Currency::NGN)
                .with_sequence(1)
                .with_debit(MoneyFixtures::ngn(5000))
                .with_invoice_no("INV-0001")
                .with_description("50 bags parboiled rice"),
            LedgerEntry::new(Book::Sales, scope, DateFixtures::jan(2), Currency::NGN)
                .with_sequence(2)
                .with_credit(MoneyFixtures::ngn(2000))
                .with_description("Cash receipt"),
            LedgerEntry::new(Book::Sales, scope, DateFixtures::jan(3), Currency::NGN)
                .with_sequence(3)
                .with_debit(MoneyFixtures::ngn(1000))
                .with_invoice_no("INV-0002")
                .with_description("10 bags broken rice"),
        ]
    }

    /// One day of cash vouchers across a few heads
    pub fn cash_day(day: NaiveDate, first_sequence: u64) -> Vec<LedgerEntry> {
        let voucher = |offset: u64, head: &str| {
            LedgerEntry::new(Book::Cash, Scope::Company, day, Currency::NGN)
                .with_sequence(first_sequence + offset)
                .with_head(head)
        };
        vec![
            voucher(0, CASH_HEADS[0]).with_debit(MoneyFixtures::ngn(25000)),
            voucher(1, CASH_HEADS[2]).with_credit(MoneyFixtures::ngn(4500)),
            voucher(2, CASH_HEADS[3]).with_credit(MoneyFixtures::ngn(12000)),
            voucher(3, CASH_HEADS[1]).with_debit(MoneyFixtures::ngn(3000)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_january_sales_is_ordered() {
        let entries = LedgerFixtures::january_sales(PartyId::new());
        assert!(domain_ledger::ensure_sorted(&entries).is_ok());
    }

    #[test]
    fn test_fake_text_is_not_empty() {
        assert!(!TextFixtures::party_name().is_empty());
        assert!(!TextFixtures::narration().is_empty());
    }
}
