//! Core Kernel - Foundational types for the claims decisioning system
//!
//! This crate provides the building blocks shared by the scoring stages and
//! the orchestrator:
//! - Money types with precise decimal arithmetic
//! - Date ranges and day arithmetic for deadlines and policy windows
//! - Strongly-typed identifiers
//! - Port infrastructure for external collaborators

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{DateRange, TemporalError, add_days, days_between, days_late};
pub use identifiers::{
    ClaimId, PolicyId, PartyId, VehicleId, DocumentId, RunId, AuditEntryId,
};
pub use ports::{PortError, DomainPort, OperationMetadata};
