//! Orchestrator state
//!
//! A run's state is a value. Each completed phase produces a new state with
//! its ledger entries and triggers appended; nothing recorded by an earlier
//! phase is touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, RunId};
use domain_claims::{EscalationTrigger, TriggerSeverity, TriggerType};

use crate::error::DecisioningError;
use crate::ledger::{LedgerEntry, ResultLedger, StageOutcome};
use crate::phase::Phase;

/// What one phase contributes to the run
#[derive(Debug, Clone, Default)]
pub struct PhaseOutput {
    pub outcomes: Vec<StageOutcome>,
    pub triggers: Vec<EscalationTrigger>,
}

impl PhaseOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, outcome: StageOutcome) -> Self {
        self.outcomes.push(outcome);
        self
    }

    pub fn raise(mut self, trigger: EscalationTrigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn raise_all(mut self, triggers: impl IntoIterator<Item = EscalationTrigger>) -> Self {
        self.triggers.extend(triggers);
        self
    }
}

/// State of one pipeline run
///
/// # Invariants
///
/// - `current_phase` only moves forward
/// - A completed phase is never re-entered
/// - Triggers are append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorState {
    pub run_id: RunId,
    pub claim_id: ClaimId,
    pub current_phase: Phase,
    pub phase_completion: [bool; 7],
    pub ledger: ResultLedger,
    pub triggers: Vec<EscalationTrigger>,
    pub started_at: DateTime<Utc>,
    /// Instant deadlines are evaluated against
    pub as_of: DateTime<Utc>,
}

impl OrchestratorState {
    pub fn new(run_id: RunId, claim_id: ClaimId, as_of: DateTime<Utc>) -> Self {
        Self {
            run_id,
            claim_id,
            current_phase: Phase::Intake,
            phase_completion: [false; 7],
            ledger: ResultLedger::new(),
            triggers: Vec::new(),
            started_at: Utc::now(),
            as_of,
        }
    }

    pub fn is_completed(&self, phase: Phase) -> bool {
        self.phase_completion[phase.index()]
    }

    /// True once the decision phase has run
    pub fn is_concluded(&self) -> bool {
        self.is_completed(Phase::Decision)
    }

    pub fn completed_phases(&self) -> Vec<Phase> {
        Phase::ALL
            .iter()
            .copied()
            .filter(|p| self.is_completed(*p))
            .collect()
    }

    fn check_entry(&self, phase: Phase) -> Result<(), DecisioningError> {
        if self.is_completed(phase) {
            return Err(DecisioningError::PhaseAlreadyCompleted(phase));
        }
        if phase != self.current_phase {
            return Err(DecisioningError::PhaseOutOfOrder {
                expected: self.current_phase,
                found: phase,
            });
        }
        Ok(())
    }

    /// Completes `phase` with its output and moves to the next phase
    ///
    /// # Errors
    ///
    /// - `PhaseAlreadyCompleted` when the phase has already run
    /// - `PhaseOutOfOrder` when `phase` is not the current phase
    /// - `DuplicateStage` when an outcome's stage is already recorded
    pub fn advance(&self, phase: Phase, output: PhaseOutput) -> Result<Self, DecisioningError> {
        if phase == Phase::Decision {
            return self.conclude();
        }
        self.check_entry(phase)?;

        let recorded_at = Utc::now();
        let mut ledger = self.ledger.clone();
        for outcome in output.outcomes {
            ledger = ledger.append(LedgerEntry::new(phase, outcome, recorded_at))?;
        }

        let mut next = self.clone();
        next.ledger = ledger;
        next.triggers.extend(output.triggers);
        next.phase_completion[phase.index()] = true;
        next.current_phase = phase.next().unwrap_or(Phase::Decision);
        Ok(next)
    }

    /// Jumps straight to the decision phase after a failed stage
    ///
    /// Phases between the failure and the decision stay incomplete.
    pub fn short_circuit(&self, phase: Phase, message: impl Into<String>) -> Self {
        self.jump_to_decision(EscalationTrigger::new(
            TriggerType::StageFailure,
            TriggerSeverity::Critical,
            format!("Phase {} failed: {}", phase, message.into()),
        ))
    }

    /// Jumps to the decision phase after the caller cancelled the run
    pub fn cancel(&self, before: Phase) -> Self {
        self.jump_to_decision(EscalationTrigger::new(
            TriggerType::Cancelled,
            TriggerSeverity::Critical,
            format!("Run cancelled before phase {}", before),
        ))
    }

    fn jump_to_decision(&self, trigger: EscalationTrigger) -> Self {
        let mut next = self.clone();
        next.triggers.push(trigger);
        next.current_phase = Phase::Decision;
        next
    }

    /// Marks the decision phase complete
    pub fn conclude(&self) -> Result<Self, DecisioningError> {
        self.check_entry(Phase::Decision)?;
        let mut next = self.clone();
        next.phase_completion[Phase::Decision.index()] = true;
        Ok(next)
    }

    pub fn fraud_score(&self) -> Option<u8> {
        self.ledger.fraud().map(|f| f.score)
    }

    pub fn has_fraud_trigger(&self) -> bool {
        self.triggers.iter().any(EscalationTrigger::is_fraud)
    }

    pub fn terminal_trigger(&self) -> Option<&EscalationTrigger> {
        self.triggers.iter().find(|t| t.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> OrchestratorState {
        OrchestratorState::new(RunId::from_u128(1), ClaimId::from_u128(2), Utc::now())
    }

    #[test]
    fn test_new_state_starts_at_intake() {
        let state = state();
        assert_eq!(state.current_phase, Phase::Intake);
        assert!(state.completed_phases().is_empty());
        assert!(!state.is_concluded());
    }

    #[test]
    fn test_advance_moves_forward_without_mutating_previous() {
        let first = state();
        let second = first.advance(Phase::Intake, PhaseOutput::new()).unwrap();

        assert_eq!(first.current_phase, Phase::Intake);
        assert_eq!(second.current_phase, Phase::Investigation);
        assert!(second.is_completed(Phase::Intake));
    }

    #[test]
    fn test_cannot_skip_a_phase() {
        let result = state().advance(Phase::Evaluation, PhaseOutput::new());
        assert!(matches!(
            result,
            Err(DecisioningError::PhaseOutOfOrder {
                expected: Phase::Intake,
                found: Phase::Evaluation
            })
        ));
    }

    #[test]
    fn test_cannot_reenter_completed_phase() {
        let state = state().advance(Phase::Intake, PhaseOutput::new()).unwrap();
        let result = state.advance(Phase::Intake, PhaseOutput::new());
        assert!(matches!(
            result,
            Err(DecisioningError::PhaseAlreadyCompleted(Phase::Intake))
        ));
    }

    #[test]
    fn test_short_circuit_goes_to_decision() {
        let state = state()
            .advance(Phase::Intake, PhaseOutput::new())
            .unwrap()
            .short_circuit(Phase::Investigation, "liability stage panicked");

        assert_eq!(state.current_phase, Phase::Decision);
        assert!(!state.is_completed(Phase::Investigation));
        let trigger = state.terminal_trigger().unwrap();
        assert_eq!(trigger.trigger_type, TriggerType::StageFailure);
        assert!(trigger.reason.contains("investigation"));

        let concluded = state.conclude().unwrap();
        assert!(concluded.is_concluded());
        assert!(concluded.conclude().is_err());
    }
}
