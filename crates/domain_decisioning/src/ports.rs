//! Decisioning Ports
//!
//! The orchestrator depends on two async collaborators, the claim record
//! store and the audit log, plus the synchronous [`JurisdictionSource`]
//! defined beside the rule table in `domain_claims`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_decisioning::{ClaimRecordPort, InMemoryClaimRecords};
//!
//! let records: Arc<dyn ClaimRecordPort> = Arc::new(InMemoryClaimRecords::new());
//! let snapshot = records.fetch_snapshot(claim_id, None).await?;
//! ```
//!
//! Adapters for a database or a claims REST service live in the surrounding
//! application and only need to implement these traits.

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, OperationMetadata, PortError};
use domain_claims::ClaimSnapshot;

pub use domain_claims::JurisdictionSource;

use crate::audit::AuditEntry;

/// Read-only access to claim records
#[async_trait]
pub trait ClaimRecordPort: DomainPort {
    /// Fetches the normalized snapshot of a claim
    ///
    /// Called once per pipeline run.
    async fn fetch_snapshot(
        &self,
        claim_id: ClaimId,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClaimSnapshot, PortError>;
}

/// Append-only audit log
#[async_trait]
pub trait AuditSink: DomainPort {
    async fn append(
        &self,
        entry: AuditEntry,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;
}
