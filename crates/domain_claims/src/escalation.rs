//! Stage names and escalation triggers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every scoring stage the pipeline can record a result for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Intake,
    Liability,
    Evidence,
    Severity,
    Valuation,
    Reserve,
    Compliance,
    Communications,
    Fraud,
    QualityReview,
    FinalValidation,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Intake => "intake",
            StageName::Liability => "liability",
            StageName::Evidence => "evidence",
            StageName::Severity => "severity",
            StageName::Valuation => "valuation",
            StageName::Reserve => "reserve",
            StageName::Compliance => "compliance",
            StageName::Communications => "communications",
            StageName::Fraud => "fraud",
            StageName::QualityReview => "quality_review",
            StageName::FinalValidation => "final_validation",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What raised an escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    DataQuality,
    Liability,
    Severity,
    Routing,
    Compliance,
    Fraud,
    QualityReview,
    FinalValidation,
    Audit,
    StageFailure,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// A condition that forces human review of a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationTrigger {
    pub trigger_type: TriggerType,
    pub severity: TriggerSeverity,
    pub reason: String,
    /// Stage that raised the trigger, if any
    pub raised_by: Option<StageName>,
}

impl EscalationTrigger {
    pub fn new(
        trigger_type: TriggerType,
        severity: TriggerSeverity,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            trigger_type,
            severity,
            reason: reason.into(),
            raised_by: None,
        }
    }

    pub fn raised_by(mut self, stage: StageName) -> Self {
        self.raised_by = Some(stage);
        self
    }

    pub fn is_fraud(&self) -> bool {
        self.trigger_type == TriggerType::Fraud
    }

    /// Failures and cancellations end the run before a decision is scored
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.trigger_type,
            TriggerType::StageFailure | TriggerType::Cancelled
        )
    }
}

impl fmt::Display for EscalationTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}/{:?}] {}", self.trigger_type, self.severity, self.reason)
    }
}
