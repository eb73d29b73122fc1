//! Core Kernel - Foundational types for the rice mill ledger
//!
//! This crate provides the building blocks shared by every other crate:
//! - Money with exact decimal arithmetic, validated at the boundary
//! - Calendar date ranges and the business timezone
//! - Typed identifiers
//! - Port and health-check abstractions for adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{DateRange, Timezone, TemporalError, parse_date};
pub use identifiers::{PartyId, EntryId};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
    OperationMetadata,
};
