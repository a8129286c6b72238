//! Audit entries
//!
//! One entry per stage invocation and one terminal entry per decision.
//! Payloads are stored as JSON so the log does not depend on the stage
//! result types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use core_kernel::{AuditEntryId, ClaimId, RunId};
use domain_claims::{ClaimSnapshot, EscalationTrigger, StageName};

use crate::decision::ClaimDecision;
use crate::ledger::StageOutcome;
use crate::phase::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditKind {
    StageInvocation { phase: Phase, stage: StageName },
    Decision,
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditKind::StageInvocation { phase, stage } => write!(f, "{}/{}", phase, stage),
            AuditKind::Decision => f.write_str("decision"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub run_id: RunId,
    pub claim_id: ClaimId,
    pub kind: AuditKind,
    pub input_summary: Value,
    pub output: Value,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn stage(
        run_id: RunId,
        claim_id: ClaimId,
        phase: Phase,
        outcome: &StageOutcome,
        input_summary: Value,
    ) -> Self {
        Self {
            id: AuditEntryId::new_v7(),
            run_id,
            claim_id,
            kind: AuditKind::StageInvocation {
                phase,
                stage: outcome.stage(),
            },
            input_summary,
            output: to_json(outcome),
            recorded_at: Utc::now(),
        }
    }

    pub fn decision(
        run_id: RunId,
        claim_id: ClaimId,
        decision: &ClaimDecision,
        triggers: &[EscalationTrigger],
    ) -> Self {
        Self {
            id: AuditEntryId::new_v7(),
            run_id,
            claim_id,
            kind: AuditKind::Decision,
            input_summary: json!({ "triggers": to_json(&triggers) }),
            output: to_json(decision),
            recorded_at: Utc::now(),
        }
    }

    pub fn stage_name(&self) -> Option<StageName> {
        match self.kind {
            AuditKind::StageInvocation { stage, .. } => Some(stage),
            AuditKind::Decision => None,
        }
    }
}

/// Key facts of the snapshot a stage was run against
pub fn snapshot_summary(snapshot: &ClaimSnapshot) -> Value {
    json!({
        "claim_number": snapshot.claim_number,
        "jurisdiction_code": snapshot.jurisdiction_code,
        "loss_date": snapshot.loss_date,
        "reported_at": snapshot.reported_at,
        "estimated_damage": snapshot.estimated_damage.to_string(),
        "vehicle_count": snapshot.vehicles.len(),
        "injured_count": snapshot.injured_count(),
        "document_count": snapshot.documents.len(),
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|err| json!({ "serialization_error": err.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{decide, DecisionPolicy};
    use crate::state::OrchestratorState;

    #[test]
    fn test_decision_entry_carries_triggers() {
        let state = OrchestratorState::new(RunId::from_u128(1), ClaimId::from_u128(2), Utc::now())
            .short_circuit(Phase::Evaluation, "valuation failed");
        let decision = decide(&state, &DecisionPolicy::default(), false);
        let entry = AuditEntry::decision(state.run_id, state.claim_id, &decision, &state.triggers);

        assert_eq!(entry.kind, AuditKind::Decision);
        assert_eq!(entry.stage_name(), None);
        assert_eq!(entry.output["decision"], "escalate_human");
        assert_eq!(entry.input_summary["triggers"][0]["trigger_type"], "stage_failure");
    }
}
