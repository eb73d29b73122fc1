//! PostgreSQL ledger adapter
//!
//! Implements `LedgerPort` over `LedgerRepository`. Stored rows are turned
//! back into domain entries here; a row that no longer decodes (unknown book,
//! unknown currency, amount with too many decimals) surfaces as an internal
//! port error rather than being silently repaired.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

use core_kernel::{
    AdapterHealth, Currency, DomainPort, EntryId, HealthCheckResult, HealthCheckable, Money,
    OperationMetadata, PartyId, PortError,
};
use domain_ledger::{Book, EntryDetails, LedgerEntry, LedgerPort, NewEntry, Scope};

use crate::repositories::ledger::{EntryRow, EntryValues, LedgerRepository};

const ADAPTER_ID: &str = "postgres-ledger-adapter";

/// PostgreSQL-backed implementation of `LedgerPort`
#[derive(Debug, Clone)]
pub struct PostgresLedgerAdapter {
    repository: LedgerRepository,
    pool: PgPool,
}

impl PostgresLedgerAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LedgerRepository::new(pool.clone()),
            pool,
        }
    }

    /// Direct access for operations outside the port, such as seeding
    /// opening balances
    pub fn repository(&self) -> &LedgerRepository {
        &self.repository
    }
}

impl DomainPort for PostgresLedgerAdapter {}

#[async_trait]
impl HealthCheckable for PostgresLedgerAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;
        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => {
                warn!(error = %e, "Ledger database health check failed");
                (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e)))
            }
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl LedgerPort for PostgresLedgerAdapter {
    #[instrument(skip(self, entry, _metadata), fields(book = %entry.book, scope = %entry.scope))]
    async fn record_entry(
        &self,
        entry: NewEntry,
        _metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntry, PortError> {
        if let Scope::Party(party) = entry.scope {
            if !self.repository.party_exists(party.into()).await? {
                return Err(PortError::not_found("Party", party));
            }
        }

        let id = EntryId::new_v7();
        let row = self
            .repository
            .insert(
                id.into(),
                entry.book.as_str(),
                entry.scope.party().map(Into::into),
                &entry_values(entry.date, entry.debit, entry.credit, &entry.details),
            )
            .await?;

        debug!(entry_id = %id, sequence = row.sequence, "Ledger entry recorded");
        row_to_entry(row)
    }

    #[instrument(skip(self, entry, _metadata), fields(entry_id = %entry.id))]
    async fn amend_entry(
        &self,
        entry: LedgerEntry,
        _metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntry, PortError> {
        let updated = self
            .repository
            .update(
                entry.id.into(),
                entry.book.as_str(),
                entry.scope.party().map(Into::into),
                &entry_values(entry.date, entry.debit, entry.credit, &entry.details),
            )
            .await?;

        match updated {
            Some(row) => row_to_entry(row),
            None => {
                // Either the entry is gone or it lives in another book/scope.
                self.repository.get(entry.id.into()).await?;
                Err(PortError::conflict(format!(
                    "entry {} cannot move to {} {}",
                    entry.id, entry.book, entry.scope
                )))
            }
        }
    }

    #[instrument(skip(self, _metadata), fields(entry_id = %id))]
    async fn get_entry(
        &self,
        id: EntryId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntry, PortError> {
        let row = self.repository.get(id.into()).await?;
        row_to_entry(row)
    }

    #[instrument(skip(self, _metadata), fields(book = %book, scope = %scope))]
    async fn entries_for_scope(
        &self,
        book: Book,
        scope: Scope,
        until: NaiveDate,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<LedgerEntry>, PortError> {
        let rows = self
            .repository
            .list_for_scope(book.as_str(), scope.party().map(Into::into), until)
            .await?;

        debug!(count = rows.len(), "Loaded ledger history");
        rows.into_iter().map(row_to_entry).collect()
    }

    async fn base_balance(
        &self,
        book: Book,
        scope: Scope,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Option<Money>, PortError> {
        let Some(row) = self
            .repository
            .opening_balance(book.as_str(), scope.party().map(Into::into))
            .await?
        else {
            return Ok(None);
        };

        let currency = Currency::from_str(&row.currency)
            .map_err(|e| PortError::internal(format!("opening balance: {}", e)))?;
        Money::exact(row.amount, currency)
            .map(Some)
            .map_err(|e| PortError::internal(format!("opening balance: {}", e)))
    }

    async fn scope_exists(
        &self,
        scope: Scope,
        _metadata: Option<OperationMetadata>,
    ) -> Result<bool, PortError> {
        match scope {
            Scope::Company => Ok(true),
            Scope::Party(party) => Ok(self.repository.party_exists(party.into()).await?),
        }
    }
}

fn entry_values(
    date: NaiveDate,
    debit: Money,
    credit: Money,
    details: &EntryDetails,
) -> EntryValues {
    EntryValues {
        entry_date: date,
        currency: debit.currency().code().to_string(),
        debit: debit.amount(),
        credit: credit.amount(),
        invoice_no: details.invoice_no.clone(),
        description: details.description.clone(),
        head: details.head.clone(),
    }
}

fn row_to_entry(row: EntryRow) -> Result<LedgerEntry, PortError> {
    let id = row.id;
    let corrupt = move |what: &str, detail: String| {
        PortError::internal(format!("ledger entry {}: bad {}: {}", id, what, detail))
    };

    let book = Book::from_str(&row.book).map_err(|e| corrupt("book", e.to_string()))?;
    let currency =
        Currency::from_str(&row.currency).map_err(|e| corrupt("currency", e.to_string()))?;
    let debit = Money::exact(row.debit, currency).map_err(|e| corrupt("debit", e.to_string()))?;
    let credit =
        Money::exact(row.credit, currency).map_err(|e| corrupt("credit", e.to_string()))?;
    let sequence =
        u64::try_from(row.sequence).map_err(|e| corrupt("sequence", e.to_string()))?;

    Ok(LedgerEntry {
        id: EntryId::from(id),
        date: row.entry_date,
        sequence,
        scope: Scope::from_party(row.party_id.map(PartyId::from)),
        book,
        debit,
        credit,
        details: EntryDetails {
            invoice_no: row.invoice_no,
            description: row.description,
            head: row.head,
            party_name: row.party_name,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn row() -> EntryRow {
        EntryRow {
            id: Uuid::new_v4(),
            sequence: 7,
            book: "sales".to_string(),
            party_id: Some(Uuid::new_v4()),
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            currency: "NGN".to_string(),
            debit: dec!(0),
            credit: dec!(2000),
            invoice_no: None,
            description: Some("Payment received".to_string()),
            head: None,
            party_name: Some("Adamu Rice Traders".to_string()),
        }
    }

    #[test]
    fn test_row_maps_to_party_entry() {
        let source = row();
        let party = source.party_id.unwrap();

        let entry = row_to_entry(source).unwrap();

        assert_eq!(entry.book, Book::Sales);
        assert_eq!(entry.scope, Scope::Party(PartyId::from(party)));
        assert_eq!(entry.sequence, 7);
        assert_eq!(entry.credit.amount(), dec!(2000));
        assert_eq!(entry.details.party_name.as_deref(), Some("Adamu Rice Traders"));
    }

    #[test]
    fn test_cash_row_without_party_is_company_scope() {
        let mut source = row();
        source.book = "cash".to_string();
        source.party_id = None;

        let entry = row_to_entry(source).unwrap();
        assert_eq!(entry.scope, Scope::Company);
    }

    #[test]
    fn test_unknown_book_is_internal_error() {
        let mut source = row();
        source.book = "payroll".to_string();

        let err = row_to_entry(source).unwrap_err();
        assert!(matches!(err, PortError::Internal { .. }));
    }

    #[test]
    fn test_sub_kobo_amount_is_rejected() {
        let mut source = row();
        source.debit = dec!(10.005);

        assert!(row_to_entry(source).is_err());
    }

    #[test]
    fn test_values_carry_currency_code() {
        let ngn = Money::new(dec!(500), Currency::NGN);
        let values = entry_values(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ngn,
            Money::zero(Currency::NGN),
            &EntryDetails::default(),
        );

        assert_eq!(values.currency, "NGN");
        assert_eq!(values.debit, dec!(500));
    }
}
