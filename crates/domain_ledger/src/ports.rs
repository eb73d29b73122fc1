//! Ledger Domain Ports
//!
//! The engine itself is pure; everything it needs from storage goes through
//! [`LedgerPort`]. The PostgreSQL adapter lives in `infra_db`; an in-memory
//! adapter is available here behind the `mock` feature for service and HTTP
//! tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_ledger::{LedgerPort, LedgerService};
//! use std::sync::Arc;
//!
//! let port: Arc<dyn LedgerPort> = Arc::new(PostgresLedgerAdapter::new(pool));
//! let service = LedgerService::new(port, Currency::NGN);
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{
    Currency, DomainPort, EntryId, HealthCheckable, Money, OperationMetadata, PortError,
};

use crate::entry::{Book, LedgerEntry, NewEntry};
use crate::scope::Scope;

/// Storage operations the ledger domain requires
///
/// Entries returned from `entries_for_scope` must be in canonical
/// `(date, sequence)` order. Balances are never stored; adapters only hold
/// entries and per-scope base balances.
#[async_trait]
pub trait LedgerPort: DomainPort + HealthCheckable {
    /// Persists a new entry, assigning its id and sequence
    ///
    /// # Returns
    ///
    /// The stored entry, or `PortError::NotFound` if the party does not exist
    async fn record_entry(
        &self,
        entry: NewEntry,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntry, PortError>;

    /// Overwrites an existing entry's date, amounts and details
    async fn amend_entry(
        &self,
        entry: LedgerEntry,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntry, PortError>;

    /// Retrieves a single entry by id
    async fn get_entry(
        &self,
        id: EntryId,
        metadata: Option<OperationMetadata>,
    ) -> Result<LedgerEntry, PortError>;

    /// Full history of one scope in one book, up to `until` inclusive
    async fn entries_for_scope(
        &self,
        book: Book,
        scope: Scope,
        until: NaiveDate,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<LedgerEntry>, PortError>;

    /// Balance carried in from before the first recorded entry, if any
    async fn base_balance(
        &self,
        book: Book,
        scope: Scope,
        metadata: Option<OperationMetadata>,
    ) -> Result<Option<Money>, PortError>;

    /// Returns true if the scope refers to a known party (company always exists)
    async fn scope_exists(
        &self,
        scope: Scope,
        metadata: Option<OperationMetadata>,
    ) -> Result<bool, PortError>;
}

/// Convenience methods over [`LedgerPort`]
#[async_trait]
pub trait LedgerPortExt: LedgerPort {
    /// Base balance, or zero in `currency` when none was carried in
    async fn base_balance_or_zero(
        &self,
        book: Book,
        scope: Scope,
        currency: Currency,
        metadata: Option<OperationMetadata>,
    ) -> Result<Money, PortError> {
        Ok(self
            .base_balance(book, scope, metadata)
            .await?
            .unwrap_or_else(|| Money::zero(currency)))
    }

    /// Fails with `NotFound` when a party scope is unknown
    async fn require_scope(
        &self,
        scope: Scope,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        if self.scope_exists(scope, metadata).await? {
            Ok(())
        } else {
            Err(PortError::not_found("Party", scope))
        }
    }
}

impl<T: LedgerPort + ?Sized> LedgerPortExt for T {}

/// In-memory adapter for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult, PartyId};
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use tokio::sync::RwLock;

    use crate::order::sort_entries;

    /// In-memory implementation of `LedgerPort`
    #[derive(Debug, Default)]
    pub struct MockLedgerPort {
        entries: RwLock<HashMap<EntryId, LedgerEntry>>,
        parties: RwLock<HashSet<PartyId>>,
        base_balances: RwLock<HashMap<(Book, Scope), Money>>,
        sequence: AtomicU64,
        unavailable: AtomicBool,
    }

    impl MockLedgerPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a party so its scope exists
        pub async fn with_party(self, party: PartyId) -> Self {
            self.parties.write().await.insert(party);
            self
        }

        /// Pre-populates entries, registering their parties
        ///
        /// Sequences already set on the entries are kept; new entries
        /// recorded afterwards continue after the highest one.
        pub async fn with_entries(self, entries: Vec<LedgerEntry>) -> Self {
            {
                let mut stored = self.entries.write().await;
                let mut parties = self.parties.write().await;
                for entry in entries {
                    if let Some(party) = entry.scope.party() {
                        parties.insert(party);
                    }
                    self.sequence.fetch_max(entry.sequence, Ordering::SeqCst);
                    stored.insert(entry.id, entry);
                }
            }
            self
        }

        /// Sets the balance carried in for a book and scope
        pub async fn with_base_balance(self, book: Book, scope: Scope, amount: Money) -> Self {
            self.base_balances.write().await.insert((book, scope), amount);
            self
        }

        /// Makes every call fail with a connection error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub async fn entry_count(&self) -> usize {
            self.entries.read().await.len()
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                Err(PortError::connection("mock ledger store unavailable"))
            } else {
                Ok(())
            }
        }

        async fn ensure_party(&self, scope: Scope) -> Result<(), PortError> {
            let Some(party) = scope.party() else {
                return Ok(());
            };
            if self.parties.read().await.contains(&party) {
                Ok(())
            } else {
                Err(PortError::not_found("Party", party))
            }
        }
    }

    impl DomainPort for MockLedgerPort {}

    #[async_trait]
    impl HealthCheckable for MockLedgerPort {
        async fn health_check(&self) -> HealthCheckResult {
            let (status, message) = if self.unavailable.load(Ordering::SeqCst) {
                (AdapterHealth::Unhealthy, "Mock adapter marked unavailable")
            } else {
                (AdapterHealth::Healthy, "Mock adapter always healthy")
            };
            HealthCheckResult {
                adapter_id: "mock-ledger-port".to_string(),
                status,
                latency_ms: 0,
                message: Some(message.to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl LedgerPort for MockLedgerPort {
        async fn record_entry(
            &self,
            entry: NewEntry,
            _metadata: Option<OperationMetadata>,
        ) -> Result<LedgerEntry, PortError> {
            self.check_available()?;
            entry
                .book
                .accepts(&entry.scope)
                .map_err(|e| PortError::validation_field(e.to_string(), "scope"))?;
            self.ensure_party(entry.scope).await?;

            let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            let stored = entry.into_entry(EntryId::new_v7(), sequence);
            self.entries.write().await.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn amend_entry(
            &self,
            entry: LedgerEntry,
            _metadata: Option<OperationMetadata>,
        ) -> Result<LedgerEntry, PortError> {
            self.check_available()?;
            let mut entries = self.entries.write().await;
            let slot = entries
                .get_mut(&entry.id)
                .ok_or_else(|| PortError::not_found("LedgerEntry", entry.id))?;
            if slot.scope != entry.scope || slot.book != entry.book {
                return Err(PortError::conflict(format!(
                    "entry {} cannot change scope or book",
                    entry.id
                )));
            }
            *slot = LedgerEntry {
                sequence: slot.sequence,
                ..entry
            };
            Ok(slot.clone())
        }

        async fn get_entry(
            &self,
            id: EntryId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<LedgerEntry, PortError> {
            self.check_available()?;
            self.entries
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("LedgerEntry", id))
        }

        async fn entries_for_scope(
            &self,
            book: Book,
            scope: Scope,
            until: NaiveDate,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<LedgerEntry>, PortError> {
            self.check_available()?;
            let mut found: Vec<_> = self
                .entries
                .read()
                .await
                .values()
                .filter(|e| e.book == book && e.scope == scope && e.date <= until)
                .cloned()
                .collect();
            sort_entries(&mut found);
            Ok(found)
        }

        async fn base_balance(
            &self,
            book: Book,
            scope: Scope,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Option<Money>, PortError> {
            self.check_available()?;
            Ok(self.base_balances.read().await.get(&(book, scope)).copied())
        }

        async fn scope_exists(
            &self,
            scope: Scope,
            _metadata: Option<OperationMetadata>,
        ) -> Result<bool, PortError> {
            self.check_available()?;
            Ok(match scope.party() {
                Some(party) => self.parties.read().await.contains(&party),
                None => true,
            })
        }
    }
}
