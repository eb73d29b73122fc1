//! Tests for domain_ledger across statements, reports and the service

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::{Currency, DateRange, Money, PartyId};

use domain_ledger::ports::mock::MockLedgerPort;
use domain_ledger::{
    compute_ledger, Book, EntryAmendment, FinancialStatement, LedgerError, LedgerPort, LedgerService,
    LedgerStatement, OpeningBalance, RequestGenerations, Scope, SearchFilter, ValidationFailure,
};

use test_utils::{
    assert_balances, assert_money_eq, assert_running_sum, assert_statement_consistent,
    DateFixtures, LedgerEntryBuilder, LedgerFixtures, LedgerHistoryBuilder, MoneyFixtures,
};

// ============================================================================
// Worked Example
// ============================================================================

mod january_scenario {
    use super::*;

    #[test]
    fn test_balances_and_totals() {
        let party = PartyId::new();
        let entries = LedgerFixtures::january_sales(party);

        let statement = LedgerStatement::build(
            Scope::Party(party),
            entries,
            DateRange::new(DateFixtures::jan(1), DateFixtures::jan(31)).unwrap(),
            OpeningBalance::Supplied(MoneyFixtures::opening_10000()),
        )
        .unwrap();

        assert_balances(&statement.rows, &[dec!(15000), dec!(13000), dec!(14000)]);
        assert_money_eq(&statement.closing_balance, dec!(14000));
        assert_money_eq(&statement.total_debit, dec!(6000));
        assert_money_eq(&statement.total_credit, dec!(2000));
        assert_statement_consistent(&statement);
    }

    #[test]
    fn test_search_shows_subset_with_original_balances() {
        let party = PartyId::new();
        let rows =
            compute_ledger(&LedgerFixtures::january_sales(party), MoneyFixtures::opening_10000())
                .unwrap();

        let filter = SearchFilter::new("INV-0002").unwrap();
        let visible = filter.apply(&rows);

        assert_eq!(visible.len(), 1);
        assert_money_eq(&visible[0].balance, dec!(14000));
    }

    #[test]
    fn test_window_from_second_day_carries_first_day() {
        let party = PartyId::new();
        let statement = LedgerStatement::build(
            Scope::Party(party),
            LedgerFixtures::january_sales(party),
            DateRange::new(DateFixtures::jan(2), DateFixtures::jan(3)).unwrap(),
            OpeningBalance::FromHistory {
                base: MoneyFixtures::opening_10000(),
            },
        )
        .unwrap();

        assert_money_eq(&statement.opening_balance, dec!(15000));
        assert_balances(&statement.rows, &[dec!(13000), dec!(14000)]);
    }
}

// ============================================================================
// Fold Edge Cases
// ============================================================================

mod fold_tests {
    use super::*;

    #[test]
    fn test_order_changes_intermediate_balances() {
        let a = LedgerEntryBuilder::new().sequence(1).debit(100);
        let b = LedgerEntryBuilder::new().sequence(2).credit(300);
        let opening = MoneyFixtures::ngn_zero();

        let ab = compute_ledger(&[a.clone().build(), b.clone().build()], opening).unwrap();
        let ba = compute_ledger(&[b.sequence(1).build(), a.sequence(2).build()], opening).unwrap();

        assert_balances(&ab, &[dec!(100), dec!(-200)]);
        assert_balances(&ba, &[dec!(-300), dec!(-200)]);
    }

    #[test]
    fn test_no_op_entry_keeps_balance() {
        let entries = LedgerHistoryBuilder::cash()
            .entry(0, 500, 0)
            .entry(0, 0, 0)
            .build();

        let rows = compute_ledger(&entries, MoneyFixtures::ngn_zero()).unwrap();
        assert_balances(&rows, &[dec!(500), dec!(500)]);
    }

    #[test]
    fn test_negative_opening_allowed() {
        let entries = LedgerHistoryBuilder::cash().entry(0, 300, 0).build();
        let rows = compute_ledger(&entries, MoneyFixtures::ngn(-1000)).unwrap();

        assert_running_sum(&rows, MoneyFixtures::ngn(-1000));
        assert_money_eq(&rows[0].balance, dec!(-700));
    }

    #[test]
    fn test_same_day_ordered_by_sequence() {
        let day = DateFixtures::feb(10);
        let late = LedgerEntryBuilder::new().on(day).sequence(9).credit(50).build();
        let early = LedgerEntryBuilder::new().on(day).sequence(4).debit(80).build();

        let result = compute_ledger(&[late, early], MoneyFixtures::ngn_zero());

        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationFailure::Unsorted { position: 1, .. }))
        ));
    }

    #[test]
    fn test_usd_entry_in_naira_ledger_rejected() {
        let entry = LedgerEntryBuilder::new()
            .currency(Currency::USD)
            .debit(100)
            .build();

        let result = compute_ledger(&[entry], MoneyFixtures::ngn_zero());
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationFailure::CurrencyMismatch { .. }))
        ));
    }
}

// ============================================================================
// Reports
// ============================================================================

mod report_tests {
    use super::*;

    #[test]
    fn test_financial_statement_heads_and_closing() {
        let mut history = LedgerFixtures::cash_day(DateFixtures::jan(5), 1);
        history.extend(LedgerFixtures::cash_day(DateFixtures::jan(6), 5));

        let fs = FinancialStatement::build(
            history,
            DateRange::new(DateFixtures::jan(1), DateFixtures::jan(31)).unwrap(),
            OpeningBalance::Supplied(MoneyFixtures::ngn(1000)),
        )
        .unwrap();

        assert_statement_consistent(&fs.statement);
        // 2 x (25000 + 3000 - 4500 - 12000)
        assert_money_eq(&fs.net_movement().unwrap(), dec!(23000));
        assert_eq!(fs.day_closes.len(), 2);
        let diesel = fs.heads.iter().find(|h| h.head == "Diesel").unwrap();
        assert_money_eq(&diesel.total_credit, dec!(9000));
        assert_eq!(diesel.entries, 2);
    }
}

// ============================================================================
// Service over the in-memory port
// ============================================================================

mod service_tests {
    use super::*;

    async fn seeded(party: PartyId) -> LedgerService<MockLedgerPort> {
        let port = MockLedgerPort::new()
            .with_entries(LedgerFixtures::january_sales(party))
            .await
            .with_base_balance(
                Book::Sales,
                Scope::Party(party),
                MoneyFixtures::opening_10000(),
            )
            .await;
        LedgerService::new(Arc::new(port), Currency::NGN)
    }

    #[tokio::test]
    async fn test_recorded_entry_appears_in_ledger() {
        let party = PartyId::new();
        let service = seeded(party).await;

        let recorded = service
            .record(
                LedgerEntryBuilder::sale(party)
                    .on(DateFixtures::jan(3))
                    .credit(4000)
                    .build_new(),
                None,
            )
            .await
            .unwrap();

        let view = service
            .party_ledger(
                Book::Sales,
                party,
                DateRange::single_day(DateFixtures::jan(3)),
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(view.statement.rows.last().unwrap().entry.id, recorded.id);
        assert_money_eq(&view.statement.opening_balance, dec!(13000));
        assert_money_eq(&view.statement.closing_balance, dec!(10000));
    }

    #[tokio::test]
    async fn test_record_rejects_company_scope_in_sales_book() {
        let service = seeded(PartyId::new()).await;
        let request = LedgerEntryBuilder::new()
            .book(Book::Sales)
            .debit(10)
            .build_new();

        let result = service.record(request, None).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_amend_returns_downstream_chain() {
        let party = PartyId::new();
        let service = seeded(party).await;
        let seeded_first = service
            .port()
            .entries_for_scope(Book::Sales, Scope::Party(party), DateFixtures::jan(31), None)
            .await
            .unwrap()[0]
            .id;

        let restatement = service
            .amend(
                seeded_first,
                EntryAmendment {
                    debit: Some(Money::new(dec!(4000), Currency::NGN)),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_money_eq(&restatement.delta, dec!(-1000));
        assert_balances(&restatement.downstream, &[dec!(14000), dec!(12000), dec!(13000)]);
        assert_money_eq(&restatement.closing_before, dec!(14000));
        assert_money_eq(&restatement.closing_after, dec!(13000));
    }
}

// ============================================================================
// Superseded Requests
// ============================================================================

mod generation_tests {
    use super::*;

    #[test]
    fn test_only_latest_request_publishes() {
        let generations = RequestGenerations::new();
        let tickets: Vec<_> = (0..5).map(|_| generations.begin("sales-ledger:tab")).collect();

        let published: Vec<_> = tickets.iter().map(|t| generations.finish(t)).collect();
        assert_eq!(published, vec![false, false, false, false, true]);
    }
}
