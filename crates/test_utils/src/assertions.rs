//! Custom Test Assertions
//!
//! Ledger-aware assertions that print the offending row instead of a bare
//! `left != right`.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_ledger::{LedgerSnapshot, LedgerStatement};

/// Asserts a Money value equals `expected` major units
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Expected {} {}, got {}",
        actual.currency().symbol(),
        expected,
        actual
    );
}

/// Asserts `snap[i].balance == snap[i-1].balance + debit_i - credit_i`,
/// starting from `opening`
pub fn assert_running_sum(rows: &[LedgerSnapshot], opening: Money) {
    let mut expected = opening.amount();
    for (i, row) in rows.iter().enumerate() {
        expected += row.entry.debit.amount() - row.entry.credit.amount();
        assert_eq!(
            row.balance.amount(),
            expected,
            "Running sum broken at row {} (entry {}, {}): balance {}, expected {}",
            i,
            row.entry.id,
            row.entry.date,
            row.balance.amount(),
            expected
        );
    }
}

/// Asserts the balances of `rows`, in order
pub fn assert_balances(rows: &[LedgerSnapshot], expected: &[Decimal]) {
    let actual: Vec<Decimal> = rows.iter().map(|r| r.balance.amount()).collect();
    assert_eq!(actual, expected, "Balance chain mismatch");
}

/// Asserts the statement's totals, closing balance and row chain agree
pub fn assert_statement_consistent(statement: &LedgerStatement) {
    assert_running_sum(&statement.rows, statement.opening_balance);

    let movement = statement.total_debit.amount() - statement.total_credit.amount();
    assert_eq!(
        statement.closing_balance.amount(),
        statement.opening_balance.amount() + movement,
        "Closing {} does not equal opening {} + debits {} - credits {}",
        statement.closing_balance,
        statement.opening_balance,
        statement.total_debit,
        statement.total_credit
    );

    match statement.rows.last() {
        Some(last) => assert_eq!(last.balance, statement.closing_balance),
        None => assert_eq!(statement.opening_balance, statement.closing_balance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{LedgerFixtures, MoneyFixtures};
    use core_kernel::PartyId;
    use domain_ledger::compute_ledger;
    use rust_decimal_macros::dec;

    #[test]
    fn test_running_sum_accepts_fold_output() {
        let entries = LedgerFixtures::january_sales(PartyId::new());
        let rows = compute_ledger(&entries, MoneyFixtures::opening_10000()).unwrap();

        assert_running_sum(&rows, MoneyFixtures::opening_10000());
        assert_balances(&rows, &[dec!(15000), dec!(13000), dec!(14000)]);
    }

    #[test]
    #[should_panic(expected = "Running sum broken")]
    fn test_running_sum_detects_wrong_opening() {
        let entries = LedgerFixtures::january_sales(PartyId::new());
        let rows = compute_ledger(&entries, MoneyFixtures::opening_10000()).unwrap();

        assert_running_sum(&rows, MoneyFixtures::ngn_zero());
    }
}
