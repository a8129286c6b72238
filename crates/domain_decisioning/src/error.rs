//! Decisioning errors

use thiserror::Error;

use domain_claims::StageName;

use crate::phase::Phase;

/// Errors raised by the orchestration protocol and its setup
///
/// Stage and port failures never appear here. A run turns them into
/// escalation triggers, so these only surface when the state machine is
/// driven out of order or the process is misconfigured.
#[derive(Debug, Error)]
pub enum DecisioningError {
    #[error("Phase out of order: expected {expected}, found {found}")]
    PhaseOutOfOrder { expected: Phase, found: Phase },

    #[error("Phase already completed: {0}")]
    PhaseAlreadyCompleted(Phase),

    #[error("Stage {0} already has a ledger entry")]
    DuplicateStage(StageName),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl From<config::ConfigError> for DecisioningError {
    fn from(err: config::ConfigError) -> Self {
        DecisioningError::Configuration(err.to_string())
    }
}
