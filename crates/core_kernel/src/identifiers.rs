//! Strongly-typed identifiers for ledger entities
//!
//! Parties and entries are both keyed by UUIDs; the newtypes keep a party id
//! from being passed where an entry id is expected. Display form carries a
//! short prefix (`PTY-…`, `ENT-…`) which parsing accepts but does not require.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.trim();
                let uuid_str = raw.strip_prefix(concat!($prefix, "-")).unwrap_or(raw);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(PartyId, "PTY");
define_id!(EntryId, "ENT");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_id_display_has_prefix() {
        let id = PartyId::new();
        assert!(id.to_string().starts_with("PTY-"));
    }

    #[test]
    fn test_entry_id_parses_with_and_without_prefix() {
        let original = EntryId::new_v7();
        let prefixed: EntryId = original.to_string().parse().unwrap();
        let bare: EntryId = original.as_uuid().to_string().parse().unwrap();
        assert_eq!(original, prefixed);
        assert_eq!(original, bare);
    }
}
