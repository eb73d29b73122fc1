//! Property-Based Test Generators
//!
//! Proptest strategies for ledger inputs that satisfy the fold's
//! preconditions: non-negative amounts in one currency, and histories in
//! strictly increasing `(date, sequence)` order.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use core_kernel::{Currency, Money};
use domain_ledger::{Book, LedgerEntry, Scope};

use crate::fixtures::CASH_HEADS;

/// Non-negative naira amount up to ₦10,000,000, in kobo steps
pub fn amount_strategy() -> impl Strategy<Value = Money> {
    (0i64..1_000_000_000i64).prop_map(|kobo| Money::from_minor(kobo, Currency::NGN))
}

/// Opening balance, which may be negative (an advance or overpayment)
pub fn opening_balance_strategy() -> impl Strategy<Value = Money> {
    (-1_000_000_000i64..1_000_000_000i64).prop_map(|kobo| Money::from_minor(kobo, Currency::NGN))
}

/// Debit and credit for one entry; either, both or neither may be zero
pub fn entry_amounts_strategy() -> impl Strategy<Value = (Money, Money)> {
    prop_oneof![
        amount_strategy().prop_map(|d| (d, Money::zero(Currency::NGN))),
        amount_strategy().prop_map(|c| (Money::zero(Currency::NGN), c)),
        (amount_strategy(), amount_strategy()),
        Just((Money::zero(Currency::NGN), Money::zero(Currency::NGN))),
    ]
}

/// Optional head name, drawn from the cash heads
pub fn head_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(CASH_HEADS.clone()).prop_map(String::from))
}

/// A history in canonical order within `scope`
///
/// Each step advances the date by 0 to 3 days and the sequence by one, so
/// same-day entries are common and keys never repeat.
pub fn history_strategy(
    book: Book,
    scope: Scope,
    len: std::ops::Range<usize>,
) -> impl Strategy<Value = Vec<LedgerEntry>> {
    prop::collection::vec((0u64..4, entry_amounts_strategy(), head_strategy()), len).prop_map(
        move |steps| {
            let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date");
            steps
                .into_iter()
                .enumerate()
                .map(|(i, (gap, (debit, credit), head))| {
                    date = date.checked_add_days(Days::new(gap)).unwrap_or(date);
                    let entry = LedgerEntry::new(book, scope, date, Currency::NGN)
                        .with_sequence(i as u64 + 1)
                        .with_debit(debit)
                        .with_credit(credit);
                    match head {
                        Some(head) => entry.with_head(head),
                        None => entry,
                    }
                })
                .collect()
        },
    )
}

/// Company cash-book history
pub fn cash_history_strategy(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<LedgerEntry>> {
    history_strategy(Book::Cash, Scope::Company, len)
}

/// Search terms, including blanks and ones that match nothing
pub fn search_term_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        Just("zzz-no-match".to_string()),
        prop::sample::select(CASH_HEADS.clone()).prop_map(|h| h.to_lowercase()),
        "[a-z]{1,3}",
    ]
}
