//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims decisioning test suite.
//!
//! # Modules
//!
//! - `fixtures`: Fixed dates, amounts and participants
//! - `builders`: `ClaimSnapshotBuilder` and scenario presets
//! - `assertions`: Assertion helpers for stage results and triggers
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
