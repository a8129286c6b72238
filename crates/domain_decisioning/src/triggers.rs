//! Escalation triggers raised from stage results
//!
//! Each function inspects one stage's result and returns the trigger it
//! warrants, if any. The orchestrator appends these to the run; nothing here
//! decides the outcome.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_claims::{
    ComplexityLevel, ComplianceReport, ComplianceStatus, EscalationTrigger, EvidenceSummary,
    FinalValidation, FraudAssessment, FraudPolicy, IntakeReport, LiabilityAssessment,
    LiabilityType, QualityReview, RoutingRecommendation, SeverityScore, StageName,
    TriggerSeverity, TriggerType,
};

/// Evidence below this completeness is flagged for follow-up
const MIN_EVIDENCE_COMPLETENESS: Decimal = dec!(0.5);

pub fn intake(report: &IntakeReport) -> Option<EscalationTrigger> {
    if report.valid {
        return None;
    }
    let issues: Vec<String> = report
        .issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect();
    Some(
        EscalationTrigger::new(
            TriggerType::DataQuality,
            TriggerSeverity::Medium,
            format!("Intake found {} issue(s): {}", issues.len(), issues.join("; ")),
        )
        .raised_by(StageName::Intake),
    )
}

pub fn liability(assessment: &LiabilityAssessment) -> Option<EscalationTrigger> {
    (assessment.liability_type == LiabilityType::Disputed).then(|| {
        EscalationTrigger::new(
            TriggerType::Liability,
            TriggerSeverity::Medium,
            format!(
                "Liability disputed: insured {}% / other party {}%",
                assessment.insured_liability, assessment.other_party_liability
            ),
        )
        .raised_by(StageName::Liability)
    })
}

pub fn evidence(summary: &EvidenceSummary) -> Option<EscalationTrigger> {
    if summary.completeness >= MIN_EVIDENCE_COMPLETENESS {
        return None;
    }
    let missing: Vec<String> = summary.missing.iter().map(|k| format!("{:?}", k)).collect();
    Some(
        EscalationTrigger::new(
            TriggerType::DataQuality,
            TriggerSeverity::Low,
            format!(
                "Evidence {}% complete; missing {}",
                (summary.completeness * Decimal::ONE_HUNDRED).round(),
                missing.join(", ")
            ),
        )
        .raised_by(StageName::Evidence),
    )
}

/// Severity escalation, or a routing trigger when the claim needs an adjuster
pub fn severity(score: &SeverityScore) -> Option<EscalationTrigger> {
    if score.escalation_required {
        let level = if score.complexity_level == ComplexityLevel::Critical {
            TriggerSeverity::Critical
        } else {
            TriggerSeverity::High
        };
        return Some(
            EscalationTrigger::new(
                TriggerType::Severity,
                level,
                format!(
                    "Severity escalation (score {}): {}",
                    score.overall_score,
                    score.escalation_reasons.join("; ")
                ),
            )
            .raised_by(StageName::Severity),
        );
    }
    (score.routing_recommendation != RoutingRecommendation::AutoApproval).then(|| {
        EscalationTrigger::new(
            TriggerType::Routing,
            TriggerSeverity::Low,
            format!("Routed to {:?}", score.routing_recommendation),
        )
        .raised_by(StageName::Severity)
    })
}

pub fn compliance(report: &ComplianceReport) -> Option<EscalationTrigger> {
    if report.status != ComplianceStatus::NonCompliant {
        return None;
    }
    let level = if report.has_critical_violation() {
        TriggerSeverity::Critical
    } else {
        TriggerSeverity::High
    };
    Some(
        EscalationTrigger::new(
            TriggerType::Compliance,
            level,
            format!(
                "Non-compliant in {} (score {}, {} violation(s))",
                report.jurisdiction_code,
                report.score,
                report.violations.len()
            ),
        )
        .raised_by(StageName::Compliance),
    )
}

/// Fraud referral; critical once the score reaches the SIU threshold
pub fn fraud(assessment: &FraudAssessment, policy: &FraudPolicy) -> Option<EscalationTrigger> {
    if assessment.score < policy.referral_threshold {
        return None;
    }
    let level = if assessment.score >= policy.siu_threshold {
        TriggerSeverity::Critical
    } else {
        TriggerSeverity::High
    };
    let codes: Vec<&str> = assessment.indicators.iter().map(|i| i.code.as_str()).collect();
    Some(
        EscalationTrigger::new(
            TriggerType::Fraud,
            level,
            format!(
                "Fraud score {} ({:?}): {}",
                assessment.score,
                assessment.risk_level,
                codes.join(", ")
            ),
        )
        .raised_by(StageName::Fraud),
    )
}

pub fn quality(review: &QualityReview) -> Option<EscalationTrigger> {
    if review.passed {
        return None;
    }
    let failed: Vec<&str> = review.failures().map(|c| c.name.as_str()).collect();
    Some(
        EscalationTrigger::new(
            TriggerType::QualityReview,
            TriggerSeverity::Medium,
            format!("Quality review failed: {}", failed.join(", ")),
        )
        .raised_by(StageName::QualityReview),
    )
}

pub fn final_validation(validation: &FinalValidation) -> Option<EscalationTrigger> {
    if validation.approved {
        return None;
    }
    let reason = match (&validation.rejection_reason, &validation.rejection_detail) {
        (Some(reason), Some(detail)) => format!("{:?}: {}", reason, detail),
        (Some(reason), None) => format!("{:?}", reason),
        _ => "no reason recorded".to_string(),
    };
    Some(
        EscalationTrigger::new(
            TriggerType::FinalValidation,
            TriggerSeverity::High,
            format!("Final validation rejected the claim: {}", reason),
        )
        .raised_by(StageName::FinalValidation),
    )
}
