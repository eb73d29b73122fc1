//! Ledger DTOs
//!
//! Money leaves the API as a decimal string in major units (`"15000.00"`).
//! Request amounts may be strings or JSON numbers; both are parsed exactly
//! and anything malformed is rejected rather than read as zero.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Currency, EntryId, Money, MoneyError, PartyId};
use domain_ledger::{
    Book, DailyReport, EntryAmendment, EntryDetails, FinancialStatement, HeadSummary, LedgerEntry,
    LedgerSnapshot, LedgerView, NewEntry, Restatement, Scope,
};

/// Formats money with exactly the currency's minor-unit places
pub fn money_string(money: &Money) -> String {
    let places = money.currency().decimal_places() as usize;
    format!("{:.*}", places, money.amount())
}

// ============================================================================
// Queries
// ============================================================================

/// `?partyId=&from=&to=&search=`
///
/// Kept as raw strings so malformed values become a 400 in the API's own
/// error shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyLedgerQuery {
    pub party_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyReportQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

// ============================================================================
// Requests
// ============================================================================

/// A monetary amount as sent by a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

impl AmountInput {
    pub fn to_money(&self, currency: Currency) -> Result<Money, MoneyError> {
        match self {
            AmountInput::Text(text) => Money::parse(text, currency),
            AmountInput::Number(number) => {
                let text = number.to_string();
                let amount = Decimal::from_str_exact(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map_err(|_| MoneyError::InvalidAmount(text.clone()))?;
                Money::exact(amount, currency)
            }
        }
    }
}

fn optional_money(
    input: &Option<AmountInput>,
    currency: Currency,
) -> Result<Option<Money>, MoneyError> {
    input.as_ref().map(|a| a.to_money(currency)).transpose()
}

/// Descriptive fields of an entry
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EntryDetailsRequest {
    #[validate(length(max = 64))]
    pub invoice_no: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub head: Option<String>,
}

impl From<EntryDetailsRequest> for EntryDetails {
    fn from(request: EntryDetailsRequest) -> Self {
        EntryDetails {
            invoice_no: request.invoice_no,
            description: request.description,
            head: request.head,
            party_name: None,
        }
    }
}

/// `POST /ledger/entries`
#[derive(Debug, Deserialize, Validate)]
pub struct RecordEntryRequest {
    pub book: Book,
    /// Required for the sales and rice purchase books, absent for cash
    #[serde(default, alias = "partyId")]
    pub party_id: Option<PartyId>,
    pub date: NaiveDate,
    #[serde(default)]
    pub debit: Option<AmountInput>,
    #[serde(default)]
    pub credit: Option<AmountInput>,
    #[serde(flatten)]
    #[validate(nested)]
    pub details: EntryDetailsRequest,
}

impl RecordEntryRequest {
    /// Missing amounts count as zero; present ones must parse
    pub fn into_new_entry(self, currency: Currency) -> Result<NewEntry, MoneyError> {
        let zero = Money::zero(currency);
        Ok(NewEntry {
            book: self.book,
            scope: Scope::from_party(self.party_id),
            date: self.date,
            debit: optional_money(&self.debit, currency)?.unwrap_or(zero),
            credit: optional_money(&self.credit, currency)?.unwrap_or(zero),
            details: self.details.into(),
        })
    }
}

/// `PUT /ledger/entries/:id`; only the fields present change
#[derive(Debug, Deserialize, Validate)]
pub struct AmendEntryRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub debit: Option<AmountInput>,
    #[serde(default)]
    pub credit: Option<AmountInput>,
    /// Replaces all descriptive fields when present
    #[serde(default)]
    #[validate(nested)]
    pub details: Option<EntryDetailsRequest>,
}

impl AmendEntryRequest {
    pub fn into_amendment(self, currency: Currency) -> Result<EntryAmendment, MoneyError> {
        Ok(EntryAmendment {
            date: self.date,
            debit: optional_money(&self.debit, currency)?,
            credit: optional_money(&self.credit, currency)?,
            details: self.details.map(Into::into),
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Envelope for every successful response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// One displayed ledger row
#[derive(Debug, Serialize)]
pub struct LedgerRowDto {
    pub id: EntryId,
    pub date: NaiveDate,
    pub invoice_no: Option<String>,
    pub description: Option<String>,
    pub head: Option<String>,
    pub party_name: Option<String>,
    pub debit: String,
    pub credit: String,
    pub balance: String,
}

impl From<&LedgerSnapshot> for LedgerRowDto {
    fn from(row: &LedgerSnapshot) -> Self {
        let entry = &row.entry;
        Self {
            id: entry.id,
            date: entry.date,
            invoice_no: entry.details.invoice_no.clone(),
            description: entry.details.description.clone(),
            head: entry.details.head.clone(),
            party_name: entry.details.party_name.clone(),
            debit: money_string(&entry.debit),
            credit: money_string(&entry.credit),
            balance: money_string(&row.balance),
        }
    }
}

fn rows<'a>(snapshots: impl IntoIterator<Item = &'a LedgerSnapshot>) -> Vec<LedgerRowDto> {
    snapshots.into_iter().map(LedgerRowDto::from).collect()
}

/// Sales or rice purchase ledger for one party
///
/// Totals and closing balance cover the whole window even when `search`
/// hides some rows.
#[derive(Debug, Serialize)]
pub struct PartyLedgerDto {
    pub party_id: PartyId,
    pub book: Book,
    pub currency: Currency,
    pub opening_balance: String,
    pub closing_balance: String,
    pub total_debit: String,
    pub total_credit: String,
    pub rows: Vec<LedgerRowDto>,
}

impl PartyLedgerDto {
    pub fn new(party_id: PartyId, book: Book, view: &LedgerView) -> Self {
        let statement = &view.statement;
        Self {
            party_id,
            book,
            currency: statement.currency(),
            opening_balance: money_string(&statement.opening_balance),
            closing_balance: money_string(&statement.closing_balance),
            total_debit: money_string(&statement.total_debit),
            total_credit: money_string(&statement.total_credit),
            rows: rows(view.rows()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HeadSummaryDto {
    pub head: String,
    pub total_debit: String,
    pub total_credit: String,
    pub net: String,
    pub entries: usize,
}

impl From<&HeadSummary> for HeadSummaryDto {
    fn from(summary: &HeadSummary) -> Self {
        Self {
            head: summary.head.clone(),
            total_debit: money_string(&summary.total_debit),
            total_credit: money_string(&summary.total_credit),
            net: money_string(&summary.net),
            entries: summary.entries,
        }
    }
}

/// Cash book for one day: receipts (credit side) and payments (debit side)
/// listed separately, plus every row with its running balance
#[derive(Debug, Serialize)]
pub struct DailyReportDto {
    pub date: NaiveDate,
    pub currency: Currency,
    pub opening_balance: String,
    pub closing_balance: String,
    pub total_receipts: String,
    pub total_payments: String,
    pub receipts: Vec<LedgerRowDto>,
    pub payments: Vec<LedgerRowDto>,
    pub rows: Vec<LedgerRowDto>,
    pub heads: Vec<HeadSummaryDto>,
}

impl From<&DailyReport> for DailyReportDto {
    fn from(report: &DailyReport) -> Self {
        let statement = &report.statement;
        Self {
            date: report.day,
            currency: statement.currency(),
            opening_balance: money_string(&statement.opening_balance),
            closing_balance: money_string(&statement.closing_balance),
            total_receipts: money_string(&statement.total_credit),
            total_payments: money_string(&statement.total_debit),
            receipts: rows(report.credits()),
            payments: rows(report.debits()),
            rows: rows(&statement.rows),
            heads: report.heads.iter().map(HeadSummaryDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayCloseDto {
    pub date: NaiveDate,
    pub closing_balance: String,
}

#[derive(Debug, Serialize)]
pub struct FinancialStatementDto {
    /// Absent when the statement covers all history
    pub from: Option<NaiveDate>,
    pub to: NaiveDate,
    pub currency: Currency,
    pub opening_balance: String,
    pub closing_balance: String,
    pub total_debit: String,
    pub total_credit: String,
    pub net_movement: String,
    pub heads: Vec<HeadSummaryDto>,
    pub day_closes: Vec<DayCloseDto>,
}

impl FinancialStatementDto {
    pub fn new(statement: &FinancialStatement, net_movement: Money) -> Self {
        let inner = &statement.statement;
        Self {
            from: Some(inner.range.start()).filter(|d| *d != NaiveDate::MIN),
            to: inner.range.end(),
            currency: inner.currency(),
            opening_balance: money_string(&inner.opening_balance),
            closing_balance: money_string(&inner.closing_balance),
            total_debit: money_string(&inner.total_debit),
            total_credit: money_string(&inner.total_credit),
            net_movement: money_string(&net_movement),
            heads: statement.heads.iter().map(HeadSummaryDto::from).collect(),
            day_closes: statement
                .day_closes
                .iter()
                .map(|close| DayCloseDto {
                    date: close.day,
                    closing_balance: money_string(&close.closing_balance),
                })
                .collect(),
        }
    }
}

/// A stored entry as returned by the write endpoints
#[derive(Debug, Serialize)]
pub struct EntryDto {
    pub id: EntryId,
    pub book: Book,
    pub party_id: Option<PartyId>,
    pub date: NaiveDate,
    pub sequence: u64,
    pub debit: String,
    pub credit: String,
    pub invoice_no: Option<String>,
    pub description: Option<String>,
    pub head: Option<String>,
}

impl From<&LedgerEntry> for EntryDto {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id,
            book: entry.book,
            party_id: entry.scope.party(),
            date: entry.date,
            sequence: entry.sequence,
            debit: money_string(&entry.debit),
            credit: money_string(&entry.credit),
            invoice_no: entry.details.invoice_no.clone(),
            description: entry.details.description.clone(),
            head: entry.details.head.clone(),
        }
    }
}

/// Result of an amendment: the stored entry and the recomputed chain
#[derive(Debug, Serialize)]
pub struct RestatementDto {
    pub entry: EntryDto,
    pub delta: String,
    pub closing_before: String,
    pub closing_after: String,
    pub downstream: Vec<LedgerRowDto>,
}

impl From<&Restatement> for RestatementDto {
    fn from(restatement: &Restatement) -> Self {
        Self {
            entry: EntryDto::from(&restatement.entry),
            delta: money_string(&restatement.delta),
            closing_before: money_string(&restatement.closing_before),
            closing_after: money_string(&restatement.closing_after),
            downstream: rows(&restatement.downstream),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_string_pads_minor_units() {
        assert_eq!(money_string(&Money::new(dec!(15000), Currency::NGN)), "15000.00");
        assert_eq!(money_string(&Money::new(dec!(-2.5), Currency::NGN)), "-2.50");
    }

    #[test]
    fn test_amount_accepts_string_and_number() {
        let text: AmountInput = serde_json::from_str(r#""1,250.50""#).unwrap();
        let number: AmountInput = serde_json::from_str("1250.5").unwrap();

        assert_eq!(
            text.to_money(Currency::NGN).unwrap(),
            number.to_money(Currency::NGN).unwrap()
        );
    }

    #[test]
    fn test_malformed_amounts_never_become_zero() {
        for bad in [r#""""#, r#""NaN""#, r#""12abc""#, r#""0.001""#] {
            let input: AmountInput = serde_json::from_str(bad).unwrap();
            assert!(input.to_money(Currency::NGN).is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn test_record_request_defaults_missing_side_to_zero() {
        let party = PartyId::new();
        let body = serde_json::json!({
            "book": "sales",
            "partyId": party,
            "date": "2024-01-01",
            "debit": "5000",
            "invoice_no": "INV-0001"
        });

        let request: RecordEntryRequest = serde_json::from_value(body).unwrap();
        let entry = request.into_new_entry(Currency::NGN).unwrap();

        assert_eq!(entry.scope, Scope::Party(party));
        assert!(entry.credit.is_zero());
        assert_eq!(entry.details.invoice_no.as_deref(), Some("INV-0001"));
    }

    #[test]
    fn test_overlong_invoice_fails_validation() {
        let body = serde_json::json!({
            "book": "cash",
            "date": "2024-01-01",
            "invoice_no": "X".repeat(65)
        });

        let request: RecordEntryRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_minor_units_survive_the_wire(minor in -10_000_000_000i64..10_000_000_000i64) {
            let money = Money::from_minor(minor, Currency::NGN);
            let input = AmountInput::Text(money_string(&money));

            prop_assert_eq!(input.to_money(Currency::NGN).unwrap(), money);
        }
    }
}
