//! Final validation
//!
//! The last gate before a claim can be approved without a human. Five
//! checks each carry a confidence penalty; any failure blocks approval.

use serde::{Deserialize, Serialize};

use crate::compliance::ComplianceStatus;
use crate::policy::ValidationPolicy;
use crate::snapshot::ClaimSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    DataCompleteness,
    PolicyValidity,
    AmountSanity,
    FraudClearance,
    ComplianceStatus,
}

impl CheckKind {
    /// Confidence points lost when the check fails
    pub fn penalty(&self) -> u8 {
        match self {
            CheckKind::DataCompleteness => 20,
            CheckKind::PolicyValidity => 30,
            CheckKind::AmountSanity => 15,
            CheckKind::FraudClearance => 25,
            CheckKind::ComplianceStatus => 10,
        }
    }

    fn rejection_reason(&self) -> RejectionReason {
        match self {
            CheckKind::DataCompleteness => RejectionReason::IncompleteData,
            CheckKind::PolicyValidity => RejectionReason::PolicyInvalid,
            CheckKind::AmountSanity => RejectionReason::AmountOutOfBounds,
            CheckKind::FraudClearance => RejectionReason::FraudSuspected,
            CheckKind::ComplianceStatus => RejectionReason::ComplianceFailure,
        }
    }
}

/// Why approval was blocked, highest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    FraudSuspected,
    PolicyInvalid,
    IncompleteData,
    AmountOutOfBounds,
    ComplianceFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub kind: CheckKind,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalValidation {
    pub approved: bool,
    pub checks: Vec<ValidationCheck>,
    /// 100 less the penalties of failed checks, 0-100
    pub confidence: u8,
    pub rejection_reason: Option<RejectionReason>,
    pub rejection_detail: Option<String>,
}

/// Upstream results the validator consults
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub snapshot: &'a ClaimSnapshot,
    /// `None` if the fraud stage produced no score
    pub fraud_score: Option<u8>,
    pub compliance_status: Option<ComplianceStatus>,
    /// A fraud-type escalation trigger was raised earlier in the run
    pub upstream_fraud_trigger: bool,
}

/// Runs the final approval checks
pub fn validate_for_approval(input: &ValidationInput<'_>, policy: &ValidationPolicy) -> FinalValidation {
    if input.upstream_fraud_trigger {
        let detail = "Fraud escalation raised earlier in the run".to_string();
        return FinalValidation {
            approved: false,
            checks: vec![ValidationCheck {
                kind: CheckKind::FraudClearance,
                passed: false,
                detail: detail.clone(),
            }],
            confidence: 0,
            rejection_reason: Some(RejectionReason::FraudSuspected),
            rejection_detail: Some(detail),
        };
    }

    let checks = vec![
        data_completeness(input.snapshot),
        policy_validity(input.snapshot),
        amount_sanity(input.snapshot, policy),
        fraud_clearance(input.fraud_score, policy),
        compliance_check(input.compliance_status),
    ];

    let penalties: u32 = checks
        .iter()
        .filter(|c| !c.passed)
        .map(|c| u32::from(c.kind.penalty()))
        .sum();
    let confidence = u8::try_from(100u32.saturating_sub(penalties)).unwrap_or(0);

    let rejection = checks
        .iter()
        .filter(|c| !c.passed)
        .min_by_key(|c| c.kind.rejection_reason());

    FinalValidation {
        approved: rejection.is_none(),
        rejection_reason: rejection.map(|c| c.kind.rejection_reason()),
        rejection_detail: rejection.map(|c| c.detail.clone()),
        checks,
        confidence,
    }
}

fn check(kind: CheckKind, problems: Vec<String>, ok: &str) -> ValidationCheck {
    ValidationCheck {
        kind,
        passed: problems.is_empty(),
        detail: if problems.is_empty() {
            ok.to_string()
        } else {
            problems.join("; ")
        },
    }
}

fn data_completeness(snapshot: &ClaimSnapshot) -> ValidationCheck {
    let mut missing = Vec::new();
    if snapshot.claim_number.trim().is_empty() {
        missing.push("claim number is missing".to_string());
    }
    if snapshot.loss_date.is_none() {
        missing.push("loss date is missing".to_string());
    }
    if snapshot
        .loss_description
        .as_deref()
        .map_or(true, |d| d.trim().is_empty())
    {
        missing.push("loss description is missing".to_string());
    }
    check(CheckKind::DataCompleteness, missing, "Required claim data present")
}

fn policy_validity(snapshot: &ClaimSnapshot) -> ValidationCheck {
    let mut problems = Vec::new();
    match snapshot.loss_date {
        Some(loss_date) if !snapshot.policy.covers(loss_date) => problems.push(format!(
            "policy {} ({:?}) does not cover loss date {}",
            snapshot.policy.policy_number, snapshot.policy.status, loss_date
        )),
        Some(_) => {}
        None => problems.push("coverage cannot be confirmed without a loss date".to_string()),
    }
    check(CheckKind::PolicyValidity, problems, "Policy in force on loss date")
}

fn amount_sanity(snapshot: &ClaimSnapshot, policy: &ValidationPolicy) -> ValidationCheck {
    let mut problems = Vec::new();
    if let Some(settlement) = snapshot.settlement_amount {
        if settlement.is_negative() {
            problems.push(format!("settlement {settlement} is negative"));
        }
        if settlement.amount() >= policy.sanity_ceiling {
            problems.push(format!(
                "settlement {} at or above sanity ceiling {}",
                settlement, policy.sanity_ceiling
            ));
        }
        if settlement.currency() != snapshot.currency {
            problems.push(format!(
                "settlement currency {} differs from claim currency {}",
                settlement.currency(),
                snapshot.currency
            ));
        }
    }
    check(CheckKind::AmountSanity, problems, "Settlement amount within bounds")
}

fn fraud_clearance(fraud_score: Option<u8>, policy: &ValidationPolicy) -> ValidationCheck {
    let problems = match fraud_score {
        Some(score) if score >= policy.fraud_threshold => vec![format!(
            "fraud score {} at or above {}",
            score, policy.fraud_threshold
        )],
        Some(_) => Vec::new(),
        None => vec!["fraud score unavailable".to_string()],
    };
    check(CheckKind::FraudClearance, problems, "Fraud score below threshold")
}

fn compliance_check(status: Option<ComplianceStatus>) -> ValidationCheck {
    let problems = match status {
        Some(ComplianceStatus::NonCompliant) => {
            vec!["claim handling is non-compliant".to_string()]
        }
        Some(_) => Vec::new(),
        None => vec!["compliance status unavailable".to_string()],
    };
    check(CheckKind::ComplianceStatus, problems, "Claim handling compliant")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalties_total_one_hundred() {
        let total: u32 = [
            CheckKind::DataCompleteness,
            CheckKind::PolicyValidity,
            CheckKind::AmountSanity,
            CheckKind::FraudClearance,
            CheckKind::ComplianceStatus,
        ]
        .iter()
        .map(|k| u32::from(k.penalty()))
        .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_rejection_reason_precedence() {
        assert!(RejectionReason::FraudSuspected < RejectionReason::PolicyInvalid);
        assert!(RejectionReason::PolicyInvalid < RejectionReason::IncompleteData);
        assert!(RejectionReason::IncompleteData < RejectionReason::AmountOutOfBounds);
        assert!(RejectionReason::AmountOutOfBounds < RejectionReason::ComplianceFailure);
    }
}
