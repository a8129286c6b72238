//! Tests for compliance monitoring and the communications plan

mod common;

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use domain_claims::communications::plan_communications;
use domain_claims::compliance::*;
use domain_claims::jurisdiction::lookup;
use domain_claims::snapshot::{ClaimSnapshot, Communication, CommunicationKind};

use common::*;

fn report(snapshot: &ClaimSnapshot, code: &str, days_after_report: i64) -> ComplianceReport {
    monitor_compliance(
        &ComplianceInput::from_snapshot(snapshot),
        lookup(code).rules(),
        reported_at() + Duration::days(days_after_report),
    )
}

fn sent(kind: CommunicationKind, days_after_report: i64) -> Communication {
    Communication {
        kind,
        sent_at: reported_at() + Duration::days(days_after_report),
    }
}

fn status_of(report: &ComplianceReport, category: RequirementCategory) -> RequirementStatus {
    report.requirement(category).unwrap().status
}

// ============================================================================
// Requirement Status Tests
// ============================================================================

mod requirement_tests {
    use super::*;

    #[test]
    fn test_fresh_claim_is_compliant() {
        let report = report(&base_snapshot(), "CA", 5);

        assert_eq!(status_of(&report, RequirementCategory::Acknowledgment), RequirementStatus::Met);
        assert_eq!(status_of(&report, RequirementCategory::Investigation), RequirementStatus::Pending);
        assert_eq!(status_of(&report, RequirementCategory::Payment), RequirementStatus::NotApplicable);
        assert_eq!(
            status_of(&report, RequirementCategory::ReservationOfRights),
            RequirementStatus::NotApplicable
        );
        assert_eq!(
            status_of(&report, RequirementCategory::DenialNotice),
            RequirementStatus::NotApplicable
        );
        assert!(report.violations.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.score, 100);
        assert_eq!(report.status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_deadlines_count_from_report() {
        let report = report(&base_snapshot(), "CA", 5);
        let ack = report.requirement(RequirementCategory::Acknowledgment).unwrap();

        assert_eq!(ack.deadline, reported_at() + Duration::days(15));
        assert!(ack.statute.starts_with("Cal. Code Regs."));
    }

    #[test]
    fn test_late_acknowledgment_is_high_violation() {
        let mut snapshot = base_snapshot();
        snapshot.communications = vec![
            sent(CommunicationKind::Acknowledgment, 35),
            sent(CommunicationKind::StatusUpdate, 25),
        ];

        let report = report(&snapshot, "CA", 36);

        assert_eq!(report.violations.len(), 1);
        let violation = &report.violations[0];
        assert_eq!(violation.category, RequirementCategory::Acknowledgment);
        assert_eq!(violation.days_late, 20);
        assert_eq!(violation.severity, ViolationSeverity::High);
        assert_eq!(report.score, 85);
        assert_eq!(report.status, ComplianceStatus::AtRisk);
    }

    #[test]
    fn test_late_payment_is_critical() {
        let mut snapshot = base_snapshot();
        snapshot.settlement_amount = Some(usd(dec!(1300)));
        snapshot.communications.push(sent(CommunicationKind::StatusUpdate, 20));
        snapshot.communications.push(sent(CommunicationKind::CoverageDecision, 30));
        snapshot.investigation_completed_at = Some(reported_at() + Duration::days(25));

        // decision 40 + payment 30 = due on day 70
        let report = report(&snapshot, "CA", 105);

        let payment = report.requirement(RequirementCategory::Payment).unwrap();
        assert_eq!(payment.status, RequirementStatus::Overdue);
        assert_eq!(payment.days_late, 35);
        assert!(report.has_critical_violation());
        assert_eq!(report.status, ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_completed_late_stays_overdue() {
        let mut snapshot = base_snapshot();
        snapshot.communications = vec![sent(CommunicationKind::Acknowledgment, 20)];

        let report = report(&snapshot, "CA", 21);

        let ack = report.requirement(RequirementCategory::Acknowledgment).unwrap();
        assert_eq!(ack.status, RequirementStatus::Overdue);
        assert_eq!(ack.days_late, 5);
        assert_eq!(report.violations[0].severity, ViolationSeverity::Low);
    }

    #[test]
    fn test_coverage_question_requires_reservation_of_rights() {
        let mut snapshot = base_snapshot();
        snapshot.coverage_question = true;
        snapshot.denial_contemplated = true;

        let report = report(&snapshot, "CA", 5);

        assert_eq!(
            status_of(&report, RequirementCategory::ReservationOfRights),
            RequirementStatus::Pending
        );
        assert_eq!(
            status_of(&report, RequirementCategory::DenialNotice),
            RequirementStatus::Pending
        );
    }

    #[test]
    fn test_coverage_decision_supersedes_status_update() {
        let mut snapshot = base_snapshot();
        snapshot.communications.push(sent(CommunicationKind::CoverageDecision, 10));

        let report = report(&snapshot, "CA", 45);

        assert_eq!(
            status_of(&report, RequirementCategory::StatusUpdate),
            RequirementStatus::NotApplicable
        );
        assert_eq!(status_of(&report, RequirementCategory::UnfairPractice), RequirementStatus::Met);
    }

    #[test]
    fn test_warnings_sorted_by_deadline() {
        let mut snapshot = base_snapshot();
        snapshot.communications.clear();

        // PA: acknowledgment due day 10, coverage decision due day 15
        let report = report(&snapshot, "PA", 9);

        let categories: Vec<RequirementCategory> =
            report.warnings.iter().map(|w| w.category).collect();
        assert_eq!(
            categories,
            vec![RequirementCategory::Acknowledgment, RequirementCategory::UnfairPractice]
        );
        assert_eq!(report.warnings[0].days_remaining, 1);
        assert_eq!(report.status, ComplianceStatus::AtRisk);
    }

    #[test]
    fn test_evaluation_is_replayable() {
        let snapshot = base_snapshot();
        assert_eq!(report(&snapshot, "NY", 12), report(&snapshot, "NY", 12));
    }
}

// ============================================================================
// Communications Plan Tests
// ============================================================================

mod communications_tests {
    use super::*;

    #[test]
    fn test_plan_lists_outstanding_correspondence() {
        let mut snapshot = base_snapshot();
        snapshot.communications.clear();
        snapshot.coverage_question = true;

        let plan = plan_communications(&report(&snapshot, "CA", 20));

        let next = plan.next_due().unwrap();
        assert_eq!(next.category, RequirementCategory::Acknowledgment);
        assert!(next.overdue);
        assert_eq!(plan.overdue_count(), 1);
        assert!(plan
            .outstanding
            .iter()
            .all(|c| c.category != RequirementCategory::Investigation));
        assert!(plan
            .outstanding
            .iter()
            .any(|c| c.category == RequirementCategory::ReservationOfRights));
    }

    #[test]
    fn test_plan_empty_when_nothing_owed() {
        let mut snapshot = base_snapshot();
        snapshot.communications.push(sent(CommunicationKind::CoverageDecision, 3));

        let plan = plan_communications(&report(&snapshot, "CA", 5));

        assert!(plan.outstanding.is_empty());
    }
}

// ============================================================================
// Properties
// ============================================================================

fn violation() -> impl Strategy<Value = ComplianceViolation> {
    (
        prop::sample::select(RequirementCategory::ALL.to_vec()),
        prop_oneof![
            Just(ViolationSeverity::Low),
            Just(ViolationSeverity::Medium),
            Just(ViolationSeverity::High),
            Just(ViolationSeverity::Critical),
        ],
        0i64..90,
    )
        .prop_map(|(category, severity, days_late)| ComplianceViolation {
            category,
            severity,
            days_late,
            statute: "test".to_string(),
            description: "test".to_string(),
        })
}

proptest! {
    #[test]
    fn prop_score_non_increasing_with_violations(
        violations in proptest::collection::vec(violation(), 0..10),
        extra in violation(),
    ) {
        let before = compliance_score(&[], &violations);
        let mut more = violations.clone();
        more.push(extra);
        let after = compliance_score(&[], &more);

        prop_assert!(before <= 100);
        prop_assert!(after <= before);
    }

    #[test]
    fn prop_report_score_in_range(
        ack_day in proptest::option::of(0i64..120),
        as_of_day in 0i64..200,
        code in prop_oneof![Just("CA"), Just("NY"), Just("FL"), Just("XX")],
        settlement in any::<bool>(),
    ) {
        let mut snapshot = base_snapshot();
        snapshot.communications = ack_day
            .map(|day| vec![sent(CommunicationKind::Acknowledgment, day)])
            .unwrap_or_default();
        if settlement {
            snapshot.settlement_amount = Some(usd(dec!(900)));
        }

        let report = report(&snapshot, code, as_of_day);

        prop_assert!(report.score <= 100);
        if report.has_critical_violation() {
            prop_assert_eq!(report.status, ComplianceStatus::NonCompliant);
        }
    }
}
