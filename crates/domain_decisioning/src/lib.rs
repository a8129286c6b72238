//! Claims Decisioning - Phase-gated orchestration of the scoring stages
//!
//! This crate turns a claim snapshot into one of four decisions:
//! - `AutoApprove` when every stage is confident and nothing was escalated
//! - `EscalateHuman` when any trigger was raised or a stage failed
//! - `SiuReview` when fraud screening crosses the SIU threshold
//! - `DraftHold` when a denial is contemplated; denials are never finalized
//!
//! The [`Orchestrator`] runs the seven [`Phase`]s in order, records every
//! stage result in an append-only [`ResultLedger`], and appends one
//! [`AuditEntry`] per stage plus one for the decision.

pub mod error;
pub mod phase;
pub mod ledger;
pub mod state;
pub mod triggers;
pub mod decision;
pub mod audit;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod orchestrator;

pub use error::DecisioningError;
pub use phase::Phase;
pub use ledger::{LedgerEntry, ResultLedger, StageOutcome};
pub use state::{OrchestratorState, PhaseOutput};
pub use decision::{decide, finalize_denial, ClaimDecision, DecisionKind, DecisionPolicy};
pub use audit::{AuditEntry, AuditKind};
pub use ports::{AuditSink, ClaimRecordPort, JurisdictionSource};
pub use adapters::{InMemoryAuditLog, InMemoryClaimRecords};
pub use config::{BatchConfig, PipelineConfig};
pub use telemetry::{init_tracing, LogFormat, TelemetryConfig};
pub use orchestrator::{CancelHandle, Orchestrator, PipelineOutcome};
