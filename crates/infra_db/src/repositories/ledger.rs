//! Ledger repository implementation
//!
//! Plain SQL over `ledger_entries`, `parties` and `opening_balances`. Rows
//! are returned as they are stored; turning them into domain entries is the
//! adapter's job. Balances are never written here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::error::DatabaseError;

// Every read joins the party name so search can match on it.
const ENTRY_COLUMNS: &str = r#"
    e.id, e.sequence, e.book, e.party_id, e.entry_date, e.currency,
    e.debit, e.credit, e.invoice_no, e.description, e.head,
    p.name AS party_name
"#;

/// A stored ledger entry
#[derive(Debug, Clone, FromRow)]
pub struct EntryRow {
    pub id: Uuid,
    pub sequence: i64,
    pub book: String,
    pub party_id: Option<Uuid>,
    pub entry_date: NaiveDate,
    pub currency: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub invoice_no: Option<String>,
    pub description: Option<String>,
    pub head: Option<String>,
    pub party_name: Option<String>,
}

/// Values written when recording or amending an entry
#[derive(Debug, Clone)]
pub struct EntryValues {
    pub entry_date: NaiveDate,
    pub currency: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub invoice_no: Option<String>,
    pub description: Option<String>,
    pub head: Option<String>,
}

/// A balance carried in from before the first entry
#[derive(Debug, Clone, FromRow)]
pub struct OpeningBalanceRow {
    pub amount: Decimal,
    pub currency: String,
}

/// Repository for ledger entries
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an entry; the database assigns the sequence
    #[instrument(skip(self, values), fields(entry_id = %id, book = book))]
    pub async fn insert(
        &self,
        id: Uuid,
        book: &str,
        party_id: Option<Uuid>,
        values: &EntryValues,
    ) -> Result<EntryRow, DatabaseError> {
        let sql = format!(
            r#"
            WITH e AS (
                INSERT INTO ledger_entries
                    (id, book, party_id, entry_date, currency, debit, credit,
                     invoice_no, description, head)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            SELECT {ENTRY_COLUMNS}
            FROM e LEFT JOIN parties p ON p.id = e.party_id
            "#
        );

        let row = sqlx::query_as::<_, EntryRow>(&sql)
            .bind(id)
            .bind(book)
            .bind(party_id)
            .bind(values.entry_date)
            .bind(&values.currency)
            .bind(values.debit)
            .bind(values.credit)
            .bind(&values.invoice_no)
            .bind(&values.description)
            .bind(&values.head)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Overwrites date, amounts and details of an entry in the given book
    /// and scope
    ///
    /// Returns `None` when no entry matches all three of id, book and party.
    #[instrument(skip(self, values), fields(entry_id = %id, book = book))]
    pub async fn update(
        &self,
        id: Uuid,
        book: &str,
        party_id: Option<Uuid>,
        values: &EntryValues,
    ) -> Result<Option<EntryRow>, DatabaseError> {
        let sql = format!(
            r#"
            WITH e AS (
                UPDATE ledger_entries
                SET entry_date = $4, currency = $5, debit = $6, credit = $7,
                    invoice_no = $8, description = $9, head = $10,
                    updated_at = now()
                WHERE id = $1 AND book = $2 AND party_id IS NOT DISTINCT FROM $3
                RETURNING *
            )
            SELECT {ENTRY_COLUMNS}
            FROM e LEFT JOIN parties p ON p.id = e.party_id
            "#
        );

        let row = sqlx::query_as::<_, EntryRow>(&sql)
            .bind(id)
            .bind(book)
            .bind(party_id)
            .bind(values.entry_date)
            .bind(&values.currency)
            .bind(values.debit)
            .bind(values.credit)
            .bind(&values.invoice_no)
            .bind(&values.description)
            .bind(&values.head)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get(&self, id: Uuid) -> Result<EntryRow, DatabaseError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entries e \
             LEFT JOIN parties p ON p.id = e.party_id WHERE e.id = $1"
        );

        sqlx::query_as::<_, EntryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("LedgerEntry", id))
    }

    /// Entries of one book and scope up to `until`, in `(date, sequence)` order
    ///
    /// `party_id = None` selects the company scope.
    #[instrument(skip(self), fields(book = book))]
    pub async fn list_for_scope(
        &self,
        book: &str,
        party_id: Option<Uuid>,
        until: NaiveDate,
    ) -> Result<Vec<EntryRow>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM ledger_entries e
            LEFT JOIN parties p ON p.id = e.party_id
            WHERE e.book = $1
              AND e.party_id IS NOT DISTINCT FROM $2
              AND e.entry_date <= $3
            ORDER BY e.entry_date, e.sequence
            "#
        );

        let rows = sqlx::query_as::<_, EntryRow>(&sql)
            .bind(book)
            .bind(party_id)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn opening_balance(
        &self,
        book: &str,
        party_id: Option<Uuid>,
    ) -> Result<Option<OpeningBalanceRow>, DatabaseError> {
        let row = sqlx::query_as::<_, OpeningBalanceRow>(
            r#"
            SELECT amount, currency
            FROM opening_balances
            WHERE book = $1 AND party_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(book)
        .bind(party_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Sets or replaces the carried-in balance for a book and scope
    pub async fn set_opening_balance(
        &self,
        book: &str,
        party_id: Option<Uuid>,
        amount: Decimal,
        currency: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO opening_balances (book, party_id, amount, currency)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (book, COALESCE(party_id, '00000000-0000-0000-0000-000000000000'::uuid))
            DO UPDATE SET amount = EXCLUDED.amount,
                          currency = EXCLUDED.currency,
                          updated_at = now()
            "#,
        )
        .bind(book)
        .bind(party_id)
        .bind(amount)
        .bind(currency)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn party_exists(&self, party_id: Uuid) -> Result<bool, DatabaseError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM parties WHERE id = $1)")
                .bind(party_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
