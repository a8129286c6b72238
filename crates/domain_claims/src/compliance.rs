//! Regulatory compliance monitoring
//!
//! Every fair-claims-practices obligation is a [`ComplianceRequirement`] with
//! a deadline counted in calendar days from the report date. Requirements are
//! evaluated against an explicit `as_of` instant so a report can be replayed
//! exactly.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{add_days, days_late};

use crate::escalation::StageName;
use crate::events::StageEvent;
use crate::jurisdiction::JurisdictionRules;
use crate::snapshot::{ClaimSnapshot, Communication, CommunicationKind};

/// Pending deadlines this close make the claim at risk
const AT_RISK_WINDOW_DAYS: i64 = 3;
/// Pending deadlines this close produce a warning
const WARNING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    Acknowledgment,
    Investigation,
    Payment,
    ReservationOfRights,
    DenialNotice,
    StatusUpdate,
    /// Failure to affirm or deny coverage within the decision window
    UnfairPractice,
}

impl RequirementCategory {
    pub const ALL: [RequirementCategory; 7] = [
        RequirementCategory::Acknowledgment,
        RequirementCategory::Investigation,
        RequirementCategory::Payment,
        RequirementCategory::ReservationOfRights,
        RequirementCategory::DenialNotice,
        RequirementCategory::StatusUpdate,
        RequirementCategory::UnfairPractice,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RequirementCategory::Acknowledgment => "acknowledgment of claim",
            RequirementCategory::Investigation => "completion of investigation",
            RequirementCategory::Payment => "payment of settlement",
            RequirementCategory::ReservationOfRights => "reservation of rights notice",
            RequirementCategory::DenialNotice => "written denial notice",
            RequirementCategory::StatusUpdate => "claimant status update",
            RequirementCategory::UnfairPractice => "coverage decision",
        }
    }

    /// Days after the report date by which the requirement is due
    pub fn deadline_days(&self, rules: &JurisdictionRules) -> u32 {
        match self {
            RequirementCategory::Acknowledgment => rules.acknowledgment_days,
            RequirementCategory::Investigation => rules.investigation_days,
            RequirementCategory::Payment => rules.decision_days + rules.payment_days,
            RequirementCategory::ReservationOfRights => rules.reservation_of_rights_days,
            RequirementCategory::DenialNotice => rules.decision_days,
            RequirementCategory::StatusUpdate => rules.status_update_days,
            RequirementCategory::UnfairPractice => rules.decision_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Met,
    Pending,
    Overdue,
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRequirement {
    pub category: RequirementCategory,
    pub deadline: DateTime<Utc>,
    pub status: RequirementStatus,
    pub statute: String,
    pub completed_at: Option<DateTime<Utc>>,
    /// Whole days past the deadline, zero unless overdue
    pub days_late: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ViolationSeverity {
    pub fn score_deduction(&self) -> u32 {
        match self {
            ViolationSeverity::Critical => 25,
            ViolationSeverity::High => 15,
            ViolationSeverity::Medium => 10,
            ViolationSeverity::Low => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceViolation {
    pub category: RequirementCategory,
    pub severity: ViolationSeverity,
    pub days_late: i64,
    pub statute: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceWarning {
    pub category: RequirementCategory,
    pub deadline: DateTime<Utc>,
    pub days_remaining: i64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    AtRisk,
    NonCompliant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub jurisdiction_code: String,
    pub requirements: Vec<ComplianceRequirement>,
    pub violations: Vec<ComplianceViolation>,
    /// Pending requirements due soon, nearest deadline first
    pub warnings: Vec<ComplianceWarning>,
    pub score: u8,
    pub status: ComplianceStatus,
    pub evaluated_at: DateTime<Utc>,
    pub events: Vec<StageEvent>,
}

impl ComplianceReport {
    pub fn requirement(&self, category: RequirementCategory) -> Option<&ComplianceRequirement> {
        self.requirements.iter().find(|r| r.category == category)
    }

    pub fn has_critical_violation(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Critical)
    }
}

/// Handling facts the monitor checks deadlines against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceInput {
    pub reported_at: DateTime<Utc>,
    pub communications: Vec<Communication>,
    pub investigation_completed_at: Option<DateTime<Utc>>,
    pub settlement_pending: bool,
    pub payment_issued_at: Option<DateTime<Utc>>,
    pub coverage_question: bool,
    pub denial_contemplated: bool,
}

impl ComplianceInput {
    pub fn from_snapshot(snapshot: &ClaimSnapshot) -> Self {
        Self {
            reported_at: snapshot.reported_at,
            communications: snapshot.communications.clone(),
            investigation_completed_at: snapshot.investigation_completed_at,
            settlement_pending: snapshot.settlement_amount.is_some(),
            payment_issued_at: snapshot.payment_issued_at,
            coverage_question: snapshot.coverage_question,
            denial_contemplated: snapshot.denial_contemplated,
        }
    }

    fn first(&self, kinds: &[CommunicationKind]) -> Option<DateTime<Utc>> {
        self.communications
            .iter()
            .filter(|c| kinds.contains(&c.kind))
            .map(|c| c.sent_at)
            .min()
    }

    fn coverage_decided_at(&self) -> Option<DateTime<Utc>> {
        let letter = self.first(&[
            CommunicationKind::CoverageDecision,
            CommunicationKind::DenialNotice,
            CommunicationKind::PaymentNotice,
        ]);
        match (letter, self.payment_issued_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether a category applies, and when it was satisfied if it was
    fn completion(&self, category: RequirementCategory) -> (bool, Option<DateTime<Utc>>) {
        match category {
            RequirementCategory::Acknowledgment => {
                (true, self.first(&[CommunicationKind::Acknowledgment]))
            }
            RequirementCategory::Investigation => (true, self.investigation_completed_at),
            RequirementCategory::Payment => (self.settlement_pending, self.payment_issued_at),
            RequirementCategory::ReservationOfRights => (
                self.coverage_question,
                self.first(&[CommunicationKind::ReservationOfRights]),
            ),
            RequirementCategory::DenialNotice => (
                self.denial_contemplated,
                self.first(&[CommunicationKind::DenialNotice]),
            ),
            RequirementCategory::StatusUpdate => {
                (true, self.first(&[CommunicationKind::StatusUpdate]))
            }
            RequirementCategory::UnfairPractice => (true, self.coverage_decided_at()),
        }
    }
}

/// Evaluates every requirement for a claim as of the given instant
///
/// # Arguments
///
/// * `input` - Claim handling history
/// * `rules` - Deadlines of the governing jurisdiction
/// * `as_of` - Instant the evaluation is made at
pub fn monitor_compliance(
    input: &ComplianceInput,
    rules: &JurisdictionRules,
    as_of: DateTime<Utc>,
) -> ComplianceReport {
    let requirements: Vec<ComplianceRequirement> = RequirementCategory::ALL
        .iter()
        .map(|category| evaluate_requirement(*category, input, rules, as_of))
        .collect();

    let violations: Vec<ComplianceViolation> = requirements
        .iter()
        .filter(|r| r.status == RequirementStatus::Overdue)
        .map(|r| ComplianceViolation {
            category: r.category,
            severity: violation_severity(r.category, r.days_late),
            days_late: r.days_late,
            statute: r.statute.clone(),
            description: format!(
                "{} due {} is {} day(s) late",
                capitalize(r.category.label()),
                r.deadline.format("%Y-%m-%d"),
                r.days_late
            ),
        })
        .collect();

    let mut warnings: Vec<ComplianceWarning> = requirements
        .iter()
        .filter(|r| r.status == RequirementStatus::Pending)
        .filter(|r| r.deadline - as_of <= Duration::days(WARNING_WINDOW_DAYS))
        .map(|r| {
            let days_remaining = (r.deadline - as_of).num_days();
            ComplianceWarning {
                category: r.category,
                deadline: r.deadline,
                days_remaining,
                message: format!(
                    "{} due in {} day(s) ({})",
                    capitalize(r.category.label()),
                    days_remaining,
                    r.statute
                ),
            }
        })
        .collect();
    warnings.sort_by_key(|w| w.deadline);

    let score = compliance_score(&requirements, &violations);
    let pending_imminent = requirements.iter().any(|r| {
        r.status == RequirementStatus::Pending
            && r.deadline - as_of <= Duration::days(AT_RISK_WINDOW_DAYS)
    });
    let status = if violations
        .iter()
        .any(|v| v.severity == ViolationSeverity::Critical)
        || score < 70
    {
        ComplianceStatus::NonCompliant
    } else if !violations.is_empty() || pending_imminent {
        ComplianceStatus::AtRisk
    } else {
        ComplianceStatus::Compliant
    };

    let events = violations
        .iter()
        .map(|v| {
            StageEvent::warning(
                StageName::Compliance,
                "compliance_violation",
                format!("{:?}: {}", v.severity, v.description),
            )
        })
        .collect();

    ComplianceReport {
        jurisdiction_code: rules.code.clone(),
        requirements,
        violations,
        warnings,
        score,
        status,
        evaluated_at: as_of,
        events,
    }
}

fn evaluate_requirement(
    category: RequirementCategory,
    input: &ComplianceInput,
    rules: &JurisdictionRules,
    as_of: DateTime<Utc>,
) -> ComplianceRequirement {
    let deadline = add_days(input.reported_at, category.deadline_days(rules));
    let (applicable, completed_at) = input.completion(category);

    // status updates stop once coverage is decided before the first one falls due
    let superseded = category == RequirementCategory::StatusUpdate
        && completed_at.is_none()
        && input.coverage_decided_at().is_some_and(|at| at <= deadline);

    let (status, late) = if !applicable || superseded {
        (RequirementStatus::NotApplicable, 0)
    } else {
        match completed_at {
            Some(at) if at <= deadline => (RequirementStatus::Met, 0),
            Some(at) => (RequirementStatus::Overdue, days_late(deadline, at)),
            None if as_of > deadline => (RequirementStatus::Overdue, days_late(deadline, as_of)),
            None => (RequirementStatus::Pending, 0),
        }
    };

    ComplianceRequirement {
        category,
        deadline,
        status,
        statute: format!("{} ({})", rules.regulation, category.label()),
        completed_at,
        days_late: late,
    }
}

/// Severity tier of a missed deadline
pub fn violation_severity(category: RequirementCategory, days_late: i64) -> ViolationSeverity {
    match category {
        RequirementCategory::Payment if days_late > 30 => ViolationSeverity::Critical,
        RequirementCategory::Acknowledgment if days_late > 10 => ViolationSeverity::High,
        _ if days_late > 7 => ViolationSeverity::Medium,
        _ => ViolationSeverity::Low,
    }
}

/// 100 less deductions for each violation and each overdue requirement
/// without a violation, floored at 0
pub fn compliance_score(
    requirements: &[ComplianceRequirement],
    violations: &[ComplianceViolation],
) -> u8 {
    let violation_deductions: u32 = violations.iter().map(|v| v.severity.score_deduction()).sum();
    let unrecorded_overdue = requirements
        .iter()
        .filter(|r| r.status == RequirementStatus::Overdue)
        .filter(|r| !violations.iter().any(|v| v.category == r.category))
        .count();
    let overdue_deductions = u32::try_from(unrecorded_overdue)
        .unwrap_or(u32::MAX)
        .saturating_mul(5);
    let deductions = violation_deductions.saturating_add(overdue_deductions);
    u8::try_from(100u32.saturating_sub(deductions)).unwrap_or(0)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_severity_tiers() {
        assert_eq!(
            violation_severity(RequirementCategory::Payment, 31),
            ViolationSeverity::Critical
        );
        assert_eq!(
            violation_severity(RequirementCategory::Payment, 30),
            ViolationSeverity::Medium
        );
        assert_eq!(
            violation_severity(RequirementCategory::Acknowledgment, 11),
            ViolationSeverity::High
        );
        assert_eq!(
            violation_severity(RequirementCategory::Investigation, 8),
            ViolationSeverity::Medium
        );
        assert_eq!(
            violation_severity(RequirementCategory::Investigation, 7),
            ViolationSeverity::Low
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("coverage decision"), "Coverage decision");
        assert_eq!(capitalize(""), "");
    }
}
