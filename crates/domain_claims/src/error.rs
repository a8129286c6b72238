//! Claims domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur while scoring a claim
///
/// None of these abort a pipeline run: validation problems become
/// escalation triggers, unknown jurisdictions fall back to the default
/// regime, and stage failures short-circuit the run to human review.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Malformed or missing snapshot field
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// Jurisdiction code not present in the rule table
    #[error("Unknown jurisdiction code: {0}")]
    UnknownJurisdiction(String),

    /// A stage's computation failed unexpectedly
    #[error("Stage {stage} failed: {message}")]
    Stage { stage: String, message: String },

    /// A hard business-rule breach, such as finalizing a denial without sign-off
    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl ClaimError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClaimError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        ClaimError::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }

    pub fn policy_violation(message: impl Into<String>) -> Self {
        ClaimError::PolicyViolation(message.into())
    }

    /// Re-labels any error as a failure of `stage`, keeping stage errors as-is
    pub fn into_stage_error(self, stage: impl Into<String>) -> Self {
        match self {
            ClaimError::Stage { .. } => self,
            other => ClaimError::stage(stage, other.to_string()),
        }
    }
}
