//! Canonical entry order
//!
//! Running balances are order-sensitive, so entries are ordered by date and
//! then by the store-assigned sequence number. Two entries may never share a
//! key; otherwise the order would only be partial.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entry::LedgerEntry;
use crate::error::ValidationFailure;

/// Total ordering key for entries within a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderKey {
    pub date: NaiveDate,
    pub sequence: u64,
}

/// Sorts entries into canonical order
pub fn sort_entries(entries: &mut [LedgerEntry]) {
    entries.sort_by_key(LedgerEntry::order_key);
}

/// Verifies entries are strictly increasing by `OrderKey`
pub fn ensure_sorted(entries: &[LedgerEntry]) -> Result<(), ValidationFailure> {
    let mut checker = OrderChecker::default();
    entries
        .iter()
        .enumerate()
        .try_for_each(|(position, entry)| checker.step(position, entry))
}

/// Incremental order check used by both the eager and the lazy fold
#[derive(Debug, Default, Clone)]
pub(crate) struct OrderChecker {
    previous: Option<(OrderKey, core_kernel::EntryId)>,
}

impl OrderChecker {
    pub(crate) fn step(
        &mut self,
        position: usize,
        entry: &LedgerEntry,
    ) -> Result<(), ValidationFailure> {
        let key = entry.order_key();
        if let Some((previous, previous_id)) = self.previous {
            if key == previous {
                return Err(ValidationFailure::DuplicateOrderKey {
                    first: previous_id,
                    second: entry.id,
                    date: key.date,
                    sequence: key.sequence,
                });
            }
            if key < previous {
                return Err(ValidationFailure::Unsorted {
                    position,
                    entry_id: entry.id,
                    date: key.date,
                    sequence: key.sequence,
                    previous_date: previous.date,
                    previous_sequence: previous.sequence,
                });
            }
        }
        self.previous = Some((key, entry.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Book;
    use crate::scope::Scope;
    use core_kernel::Currency;

    fn at(day: u32, sequence: u64) -> LedgerEntry {
        LedgerEntry::new(
            Book::Cash,
            Scope::Company,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            Currency::NGN,
        )
        .with_sequence(sequence)
    }

    #[test]
    fn test_sequence_breaks_date_ties() {
        let mut entries = vec![at(2, 9), at(1, 5), at(2, 3)];
        sort_entries(&mut entries);

        let keys: Vec<_> = entries.iter().map(|e| (e.date.format("%d").to_string(), e.sequence)).collect();
        assert_eq!(
            keys,
            vec![("01".to_string(), 5), ("02".to_string(), 3), ("02".to_string(), 9)]
        );
        assert!(ensure_sorted(&entries).is_ok());
    }

    #[test]
    fn test_unsorted_reports_position() {
        let entries = vec![at(1, 1), at(3, 2), at(2, 3)];

        match ensure_sorted(&entries) {
            Err(ValidationFailure::Unsorted { position, .. }) => assert_eq!(position, 2),
            other => panic!("expected Unsorted, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let entries = vec![at(1, 4), at(1, 4)];

        assert!(matches!(
            ensure_sorted(&entries),
            Err(ValidationFailure::DuplicateOrderKey { .. })
        ));
    }
}
