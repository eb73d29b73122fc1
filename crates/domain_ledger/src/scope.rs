//! Ledger scopes
//!
//! A running balance only means something within one scope: a single party's
//! account, or the company as a whole for daily and period reports. Mixed
//! input is partitioned first and every partition is folded on its own.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use core_kernel::{Currency, Money, PartyId};

use crate::entry::LedgerEntry;
use crate::error::LedgerError;
use crate::ledger::{compute_scoped_ledger, LedgerSnapshot};

/// The account a ledger is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "party_id", rename_all = "snake_case")]
pub enum Scope {
    /// Company-wide (daily report, financial statement)
    Company,
    /// A single customer or supplier
    Party(PartyId),
}

impl Scope {
    /// Maps the nullable party reference of a stored row to a scope
    pub fn from_party(party: Option<PartyId>) -> Self {
        party.map_or(Scope::Company, Scope::Party)
    }

    pub fn party(&self) -> Option<PartyId> {
        match self {
            Scope::Company => None,
            Scope::Party(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Company => f.write_str("company"),
            Scope::Party(id) => write!(f, "{}", id),
        }
    }
}

/// Groups entries by scope, keeping each group's relative input order
pub fn partition_by_scope<I>(entries: I) -> BTreeMap<Scope, Vec<LedgerEntry>>
where
    I: IntoIterator<Item = LedgerEntry>,
{
    let mut groups: BTreeMap<Scope, Vec<LedgerEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.scope).or_default().push(entry);
    }
    groups
}

/// Folds each scope independently
///
/// Scopes missing from `openings` start from zero. Each partition must
/// already be in `(date, sequence)` order.
pub fn fold_each_scope<I>(
    entries: I,
    openings: &HashMap<Scope, Money>,
    currency: Currency,
) -> Result<BTreeMap<Scope, Vec<LedgerSnapshot>>, LedgerError>
where
    I: IntoIterator<Item = LedgerEntry>,
{
    partition_by_scope(entries)
        .into_iter()
        .map(|(scope, group)| {
            let opening = openings
                .get(&scope)
                .copied()
                .unwrap_or_else(|| Money::zero(currency));
            compute_scoped_ledger(scope, &group, opening).map(|rows| (scope, rows))
        })
        .collect()
}
