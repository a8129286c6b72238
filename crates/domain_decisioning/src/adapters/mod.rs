//! Adapters for the decisioning ports
//!
//! # Available Adapters
//!
//! - **InMemoryClaimRecords**: snapshots held in memory, for tests and replay
//! - **InMemoryAuditLog**: audit entries held in memory
//!
//! The jurisdiction rule table ships as `StaticJurisdictionTable` in
//! `domain_claims`.

pub mod memory;

pub use memory::{InMemoryAuditLog, InMemoryClaimRecords};
