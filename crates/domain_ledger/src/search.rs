//! Free-text search over computed ledger rows
//!
//! Search only decides which rows are shown. It runs on snapshots after the
//! fold, so a surviving row keeps the balance it had in the full ledger.

use crate::entry::LedgerEntry;
use crate::ledger::LedgerSnapshot;

/// Case-insensitive substring match over invoice number, description,
/// head and party name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    /// Returns `None` for a blank query, which matches everything
    pub fn new(query: &str) -> Option<Self> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            None
        } else {
            Some(Self { needle })
        }
    }

    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        entry
            .details
            .searchable()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }

    /// Selects the rows to display, leaving balances untouched
    pub fn apply<'a>(&self, rows: &'a [LedgerSnapshot]) -> Vec<&'a LedgerSnapshot> {
        rows.iter().filter(|row| self.matches(&row.entry)).collect()
    }
}

/// Applies an optional filter; `None` keeps every row
pub fn visible_rows<'a>(
    rows: &'a [LedgerSnapshot],
    filter: Option<&SearchFilter>,
) -> Vec<&'a LedgerSnapshot> {
    match filter {
        Some(filter) => filter.apply(rows),
        None => rows.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Book;
    use crate::scope::Scope;
    use chrono::NaiveDate;
    use core_kernel::Currency;

    fn entry() -> LedgerEntry {
        LedgerEntry::new(
            Book::Cash,
            Scope::Company,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Currency::NGN,
        )
    }

    #[test]
    fn test_blank_query_is_no_filter() {
        assert!(SearchFilter::new("   ").is_none());
    }

    #[test]
    fn test_matches_any_descriptive_field_case_insensitively() {
        let filter = SearchFilter::new("DIESEL").unwrap();

        assert!(filter.matches(&entry().with_head("Diesel & Generator")));
        assert!(filter.matches(&entry().with_description("diesel for dryer")));
        assert!(!filter.matches(&entry().with_invoice_no("INV-2041")));
    }

    #[test]
    fn test_entry_without_details_never_matches() {
        let filter = SearchFilter::new("inv").unwrap();
        assert!(!filter.matches(&entry()));
    }
}
