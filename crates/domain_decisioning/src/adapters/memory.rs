//! In-memory adapters

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, DomainPort, OperationMetadata, PortError};
use domain_claims::ClaimSnapshot;

use crate::audit::AuditEntry;
use crate::ports::{AuditSink, ClaimRecordPort};

/// Claim snapshots keyed by claim id
#[derive(Debug, Default)]
pub struct InMemoryClaimRecords {
    snapshots: RwLock<HashMap<ClaimId, ClaimSnapshot>>,
}

impl InMemoryClaimRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshots(snapshots: impl IntoIterator<Item = ClaimSnapshot>) -> Self {
        let snapshots = snapshots
            .into_iter()
            .map(|s| (s.claim_id, s))
            .collect();
        Self {
            snapshots: RwLock::new(snapshots),
        }
    }

    /// Stores a snapshot, replacing any earlier one for the same claim
    pub async fn insert(&self, snapshot: ClaimSnapshot) {
        self.snapshots
            .write()
            .await
            .insert(snapshot.claim_id, snapshot);
    }

    pub async fn count(&self) -> usize {
        self.snapshots.read().await.len()
    }
}

impl DomainPort for InMemoryClaimRecords {}

#[async_trait]
impl ClaimRecordPort for InMemoryClaimRecords {
    #[instrument(skip(self, claim_id, metadata), fields(claim_id = %claim_id))]
    async fn fetch_snapshot(
        &self,
        claim_id: ClaimId,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClaimSnapshot, PortError> {
        debug!(
            correlation_id = ?metadata.and_then(|m| m.correlation_id),
            "Fetching claim snapshot"
        );
        self.snapshots
            .read()
            .await
            .get(&claim_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("ClaimSnapshot", claim_id))
    }
}

/// Audit entries in arrival order
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    pub async fn entries_for(&self, claim_id: ClaimId) -> Vec<AuditEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.claim_id == claim_id)
            .cloned()
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl DomainPort for InMemoryAuditLog {}

#[async_trait]
impl AuditSink for InMemoryAuditLog {
    #[instrument(skip(self, entry, metadata), fields(run_id = %entry.run_id, kind = %entry.kind))]
    async fn append(
        &self,
        entry: AuditEntry,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        debug!(
            correlation_id = ?metadata.and_then(|m| m.correlation_id),
            "Appending audit entry"
        );
        self.entries.write().await.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::RunId;

    use crate::decision::{decide, DecisionPolicy};
    use crate::phase::Phase;
    use crate::state::OrchestratorState;

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let records = InMemoryClaimRecords::new();

        let err = records
            .fetch_snapshot(ClaimId::from_u128(7), None)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_audit_entries_filter_by_claim() {
        let log = InMemoryAuditLog::new();
        for n in [1u128, 2, 1] {
            let state = OrchestratorState::new(RunId::from_u128(n), ClaimId::from_u128(n), Utc::now())
                .short_circuit(Phase::Intake, "no record");
            let decision = decide(&state, &DecisionPolicy::default(), false);
            let entry = AuditEntry::decision(state.run_id, state.claim_id, &decision, &state.triggers);
            log.append(entry, None).await.unwrap();
        }

        assert_eq!(log.count().await, 3);
        assert_eq!(log.entries_for(ClaimId::from_u128(1)).await.len(), 2);
    }
}
