//! Tests for final validation

mod common;

use rust_decimal_macros::dec;

use domain_claims::compliance::ComplianceStatus;
use domain_claims::policy::ValidationPolicy;
use domain_claims::snapshot::{ClaimSnapshot, PolicyStatus};
use domain_claims::validation::*;

use common::*;

fn validate(snapshot: &ClaimSnapshot, fraud_score: Option<u8>) -> FinalValidation {
    validate_for_approval(
        &ValidationInput {
            snapshot,
            fraud_score,
            compliance_status: Some(ComplianceStatus::Compliant),
            upstream_fraud_trigger: false,
        },
        &ValidationPolicy::default(),
    )
}

fn failed(result: &FinalValidation) -> Vec<CheckKind> {
    result.checks.iter().filter(|c| !c.passed).map(|c| c.kind).collect()
}

#[test]
fn test_clean_claim_passes_every_check() {
    let result = validate(&base_snapshot(), Some(0));

    assert!(result.approved);
    assert_eq!(result.confidence, 100);
    assert_eq!(result.checks.len(), 5);
    assert!(result.rejection_reason.is_none());
}

#[test]
fn test_upstream_fraud_trigger_fails_immediately() {
    let snapshot = base_snapshot();
    let result = validate_for_approval(
        &ValidationInput {
            snapshot: &snapshot,
            fraud_score: Some(10),
            compliance_status: Some(ComplianceStatus::Compliant),
            upstream_fraud_trigger: true,
        },
        &ValidationPolicy::default(),
    );

    assert!(!result.approved);
    assert_eq!(result.confidence, 0);
    assert_eq!(result.rejection_reason, Some(RejectionReason::FraudSuspected));
}

#[test]
fn test_lapsed_policy_fails_policy_check() {
    let mut snapshot = base_snapshot();
    snapshot.policy.status = PolicyStatus::Lapsed;

    let result = validate(&snapshot, Some(0));

    assert_eq!(failed(&result), vec![CheckKind::PolicyValidity]);
    assert_eq!(result.confidence, 70);
    assert_eq!(result.rejection_reason, Some(RejectionReason::PolicyInvalid));
}

#[test]
fn test_loss_outside_policy_term_fails() {
    let mut snapshot = base_snapshot();
    snapshot.loss_date = Some(date(2024, 6, 2));

    let result = validate(&snapshot, Some(0));

    assert_eq!(failed(&result), vec![CheckKind::PolicyValidity]);
}

#[test]
fn test_missing_loss_date_fails_completeness_and_policy() {
    let mut snapshot = base_snapshot();
    snapshot.loss_date = None;

    let result = validate(&snapshot, Some(0));

    assert_eq!(
        failed(&result),
        vec![CheckKind::DataCompleteness, CheckKind::PolicyValidity]
    );
    assert_eq!(result.confidence, 50);
    assert_eq!(result.rejection_reason, Some(RejectionReason::PolicyInvalid));
}

#[test]
fn test_rejection_precedence_prefers_fraud() {
    let mut snapshot = base_snapshot();
    snapshot.loss_description = None;
    snapshot.settlement_amount = Some(usd(dec!(2000000)));

    let result = validate(&snapshot, Some(65));

    assert_eq!(
        failed(&result),
        vec![CheckKind::DataCompleteness, CheckKind::AmountSanity, CheckKind::FraudClearance]
    );
    assert_eq!(result.confidence, 40);
    assert_eq!(result.rejection_reason, Some(RejectionReason::FraudSuspected));
}

#[test]
fn test_negative_settlement_fails_amount_check() {
    let mut snapshot = base_snapshot();
    snapshot.settlement_amount = Some(usd(dec!(-10)));

    let result = validate(&snapshot, Some(0));

    assert_eq!(result.rejection_reason, Some(RejectionReason::AmountOutOfBounds));
}

#[test]
fn test_missing_fraud_score_blocks_approval() {
    let result = validate(&base_snapshot(), None);

    assert!(!result.approved);
    assert_eq!(failed(&result), vec![CheckKind::FraudClearance]);
}

#[test]
fn test_non_compliant_handling_blocks_approval() {
    let snapshot = base_snapshot();
    let result = validate_for_approval(
        &ValidationInput {
            snapshot: &snapshot,
            fraud_score: Some(0),
            compliance_status: Some(ComplianceStatus::NonCompliant),
            upstream_fraud_trigger: false,
        },
        &ValidationPolicy::default(),
    );

    assert_eq!(result.confidence, 90);
    assert_eq!(result.rejection_reason, Some(RejectionReason::ComplianceFailure));
}
