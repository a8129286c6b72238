//! Final claim decision
//!
//! The decision phase reads the finished ledger and trigger list and picks
//! one of four outcomes. Precedence is fixed: a failed or cancelled run is
//! escalated as-is; otherwise SIU review beats a drafted denial, which beats
//! generic escalation, which beats automated approval.
//!
//! The pipeline never denies a claim. A contemplated denial is drafted and
//! held for an adjuster; [`finalize_denial`] exists only to reject any
//! attempt to release one automatically.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;
use domain_claims::{ClaimError, EscalationTrigger, TriggerSeverity};

use crate::state::OrchestratorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    AutoApprove,
    EscalateHuman,
    SiuReview,
    DraftHold,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DecisionKind::AutoApprove => "auto_approve",
            DecisionKind::EscalateHuman => "escalate_human",
            DecisionKind::SiuReview => "siu_review",
            DecisionKind::DraftHold => "draft_hold",
        };
        f.write_str(label)
    }
}

/// Thresholds for the decision phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    /// Highest estimated value that may be approved automatically
    pub auto_approve_ceiling: Decimal,
    /// Lowest aggregate confidence that may be approved automatically
    pub min_confidence: Decimal,
    /// Fraud score must be below this for automated approval
    pub fraud_pass_threshold: u8,
    /// Fraud score at or above this goes to the SIU
    pub siu_threshold: u8,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            auto_approve_ceiling: dec!(5000),
            min_confidence: dec!(0.75),
            fraud_pass_threshold: 30,
            siu_threshold: 70,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDecision {
    pub decision: DecisionKind,
    pub reason: String,
    /// Aggregate confidence, 0 to 1
    pub confidence: Decimal,
    pub estimated_value: Option<Money>,
    pub decided_at: DateTime<Utc>,
}

impl ClaimDecision {
    fn new(
        decision: DecisionKind,
        reason: impl Into<String>,
        confidence: Decimal,
        estimated_value: Option<Money>,
    ) -> Self {
        Self {
            decision,
            reason: reason.into(),
            confidence,
            estimated_value,
            decided_at: Utc::now(),
        }
    }

    pub fn is_auto_approved(&self) -> bool {
        self.decision == DecisionKind::AutoApprove
    }
}

/// Picks the decision for a finished run
///
/// # Arguments
///
/// * `state` - State after the last phase that ran
/// * `policy` - Decision thresholds
/// * `denial_contemplated` - Whether the adjuster flagged a possible denial
pub fn decide(
    state: &OrchestratorState,
    policy: &DecisionPolicy,
    denial_contemplated: bool,
) -> ClaimDecision {
    let estimated_value = state.ledger.valuation().map(|v| v.estimated_value);
    let confidence = state.ledger.aggregate_confidence().unwrap_or(Decimal::ZERO);

    if let Some(trigger) = state.terminal_trigger() {
        return ClaimDecision::new(
            DecisionKind::EscalateHuman,
            trigger.reason.clone(),
            Decimal::ZERO,
            estimated_value,
        );
    }

    let fraud_score = state.fraud_score();
    if let Some(reason) = siu_reason(state, fraud_score, policy) {
        return ClaimDecision::new(DecisionKind::SiuReview, reason, confidence, estimated_value);
    }

    if denial_contemplated {
        return ClaimDecision::new(
            DecisionKind::DraftHold,
            "Denial drafted and held for adjuster sign-off",
            confidence,
            estimated_value,
        );
    }

    if !state.triggers.is_empty() {
        return ClaimDecision::new(
            DecisionKind::EscalateHuman,
            join_reasons(&state.triggers),
            confidence,
            estimated_value,
        );
    }

    let mut blockers = Vec::new();
    match estimated_value {
        Some(value) if value.amount() <= policy.auto_approve_ceiling => {}
        Some(value) => blockers.push(format!(
            "estimated value {} exceeds {}",
            value, policy.auto_approve_ceiling
        )),
        None => blockers.push("no valuation recorded".to_string()),
    }
    if confidence < policy.min_confidence {
        blockers.push(format!(
            "confidence {} below {}",
            confidence, policy.min_confidence
        ));
    }
    match fraud_score {
        Some(score) if score < policy.fraud_pass_threshold => {}
        Some(score) => blockers.push(format!(
            "fraud score {} not below {}",
            score, policy.fraud_pass_threshold
        )),
        None => blockers.push("no fraud score recorded".to_string()),
    }

    if blockers.is_empty() {
        ClaimDecision::new(
            DecisionKind::AutoApprove,
            format!("All checks passed with confidence {}", confidence),
            confidence,
            estimated_value,
        )
    } else {
        ClaimDecision::new(
            DecisionKind::EscalateHuman,
            format!("Not eligible for automated approval: {}", blockers.join("; ")),
            confidence,
            estimated_value,
        )
    }
}

fn siu_reason(
    state: &OrchestratorState,
    fraud_score: Option<u8>,
    policy: &DecisionPolicy,
) -> Option<String> {
    if let Some(score) = fraud_score.filter(|s| *s >= policy.siu_threshold) {
        return Some(format!(
            "Fraud score {} at or above SIU threshold {}",
            score, policy.siu_threshold
        ));
    }
    state
        .triggers
        .iter()
        .find(|t| t.is_fraud() && t.severity == TriggerSeverity::Critical)
        .map(|t| t.reason.clone())
}

fn join_reasons(triggers: &[EscalationTrigger]) -> String {
    triggers
        .iter()
        .map(|t| t.reason.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Rejects any attempt to finalize a denial without human sign-off
pub fn finalize_denial(decision: &ClaimDecision) -> Result<(), ClaimError> {
    Err(ClaimError::policy_violation(format!(
        "Denials require adjuster sign-off; refusing to finalize a {} decision",
        decision.decision
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{ClaimId, RunId};
    use domain_claims::TriggerType;

    use crate::phase::Phase;
    use crate::state::PhaseOutput;

    fn state() -> OrchestratorState {
        OrchestratorState::new(RunId::from_u128(7), ClaimId::from_u128(8), Utc::now())
    }

    #[test]
    fn test_empty_run_is_not_auto_approved() {
        let decision = decide(&state(), &DecisionPolicy::default(), false);
        assert_eq!(decision.decision, DecisionKind::EscalateHuman);
        assert!(decision.reason.contains("no valuation recorded"));
    }

    #[test]
    fn test_failed_run_escalates_with_reason() {
        let failed = state().short_circuit(Phase::Intake, "record unreadable");
        let decision = decide(&failed, &DecisionPolicy::default(), true);

        assert_eq!(decision.decision, DecisionKind::EscalateHuman);
        assert!(decision.reason.contains("record unreadable"));
        assert_eq!(decision.confidence, Decimal::ZERO);
    }

    #[test]
    fn test_critical_fraud_trigger_beats_draft_hold() {
        let state = state()
            .advance(
                Phase::Intake,
                PhaseOutput::new().raise(EscalationTrigger::new(
                    TriggerType::Fraud,
                    TriggerSeverity::Critical,
                    "Staged loss suspected",
                )),
            )
            .unwrap();
        let decision = decide(&state, &DecisionPolicy::default(), true);
        assert_eq!(decision.decision, DecisionKind::SiuReview);
    }

    #[test]
    fn test_denial_is_drafted_not_finalized() {
        let decision = decide(&state(), &DecisionPolicy::default(), true);
        assert_eq!(decision.decision, DecisionKind::DraftHold);
        assert!(matches!(
            finalize_denial(&decision),
            Err(ClaimError::PolicyViolation(_))
        ));
    }

    #[test]
    fn test_decision_kind_serializes_snake_case() {
        let json = serde_json::to_string(&DecisionKind::SiuReview).unwrap();
        assert_eq!(json, "\"siu_review\"");
    }
}
