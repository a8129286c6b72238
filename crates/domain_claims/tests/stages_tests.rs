//! Tests for intake, evidence, valuation, reserve, quality and fraud stages

mod common;

use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};

use domain_claims::evidence::summarize_evidence;
use domain_claims::fraud::{assess_fraud, FraudInput, FraudRiskLevel};
use domain_claims::intake::review_intake;
use domain_claims::jurisdiction::{lookup, NegligenceRegime};
use domain_claims::policy::{FraudPolicy, SeverityPolicy};
use domain_claims::quality::review_quality;
use domain_claims::reserve::{recommend_reserve, ReserveType};
use domain_claims::severity::{score_severity, SeverityInput};
use domain_claims::snapshot::*;
use domain_claims::valuation::{value_claim, ValuationInput};
use domain_claims::ClaimError;

use common::*;

// ============================================================================
// Intake Tests
// ============================================================================

mod intake_tests {
    use super::*;

    fn fields(snapshot: &ClaimSnapshot) -> Vec<String> {
        review_intake(snapshot, &lookup(&snapshot.jurisdiction_code))
            .issues
            .into_iter()
            .map(|i| i.field)
            .collect()
    }

    #[test]
    fn test_clean_snapshot_passes_intake() {
        let snapshot = base_snapshot();
        let report = review_intake(&snapshot, &lookup("CA"));

        assert!(report.valid);
        assert!(report.issues.is_empty());
        assert_eq!(report.applied_jurisdiction, "CA");
        assert_eq!(report.confidence, dec!(1.0));
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let mut snapshot = base_snapshot();
        snapshot.claim_number = String::new();
        snapshot.loss_date = None;
        snapshot.vehicles.clear();

        let fields = fields(&snapshot);

        assert!(fields.contains(&"claim_number".to_string()));
        assert!(fields.contains(&"loss_date".to_string()));
        assert!(fields.contains(&"vehicles".to_string()));
    }

    #[test]
    fn test_nested_errors_carry_their_path() {
        let mut snapshot = base_snapshot();
        snapshot.vehicles[0].model_year = 1850;

        assert_eq!(fields(&snapshot), vec!["vehicles[0].model_year".to_string()]);
    }

    #[test]
    fn test_loss_after_report_is_flagged() {
        let mut snapshot = base_snapshot();
        snapshot.loss_date = Some(date(2024, 3, 12));

        assert_eq!(fields(&snapshot), vec!["loss_date".to_string()]);
    }

    #[test]
    fn test_severity_without_injured_persons_is_flagged() {
        let mut snapshot = base_snapshot();
        snapshot.injury = Some(InjuryReport {
            injured_count: 0,
            severity: Some(InjurySeverity::Fatal),
            description: None,
        });

        let report = review_intake(&snapshot, &lookup("CA"));

        assert!(!report.valid);
        assert_eq!(fields(&snapshot), vec!["injury.injured_count".to_string()]);
        assert!(report.issues[0].message.contains("Fatal"));
    }

    #[test]
    fn test_unassessed_injury_is_not_an_intake_issue() {
        let mut snapshot = base_snapshot();
        snapshot.injury = Some(InjuryReport {
            injured_count: 1,
            severity: None,
            description: None,
        });

        assert!(fields(&snapshot).is_empty());
    }

    #[test]
    fn test_currency_mismatch_is_flagged() {
        let mut snapshot = base_snapshot();
        snapshot.damage_items[0].estimate = Money::new(dec!(1200), Currency::CAD);

        assert_eq!(fields(&snapshot), vec!["damage_items[0].estimate".to_string()]);
    }

    #[test]
    fn test_unknown_jurisdiction_applies_default() {
        let mut snapshot = base_snapshot();
        snapshot.jurisdiction_code = "ZZ".to_string();

        let report = review_intake(&snapshot, &lookup("ZZ"));

        assert!(report.valid);
        assert!(report.default_jurisdiction_applied);
        assert_eq!(report.applied_jurisdiction, "DEFAULT");
        assert_eq!(report.confidence, dec!(0.9));
        assert!(report
            .events
            .iter()
            .any(|e| e.code == "jurisdiction_default_applied" && e.is_warning()));
    }

    #[test]
    fn test_issue_converts_to_validation_error() {
        let mut snapshot = base_snapshot();
        snapshot.claim_number = String::new();
        let issue = review_intake(&snapshot, &lookup("CA")).issues.remove(0);

        let error = ClaimError::from(issue);

        assert!(matches!(error, ClaimError::Validation { ref field, .. } if field == "claim_number"));
    }
}

// ============================================================================
// Evidence Tests
// ============================================================================

mod evidence_tests {
    use super::*;

    #[test]
    fn test_single_vehicle_claim_needs_photos_and_estimate() {
        let summary = summarize_evidence(&base_snapshot());

        assert!(summary.is_complete());
        assert_eq!(summary.completeness, dec!(1));
        assert_eq!(summary.documents_received[&DocumentKind::Photo], 1);
    }

    #[test]
    fn test_injury_collision_needs_more_documents() {
        let mut snapshot = two_car_snapshot(DamageLocation::Rear, DamageLocation::Front);
        snapshot.injury = Some(InjuryReport {
            injured_count: 1,
            severity: Some(InjurySeverity::Minor),
            description: None,
        });

        let summary = summarize_evidence(&snapshot);

        assert_eq!(summary.completeness, dec!(0.4));
        assert_eq!(
            summary.missing,
            vec![
                DocumentKind::PoliceReport,
                DocumentKind::Statement,
                DocumentKind::MedicalRecord
            ]
        );
        assert_eq!(summary.confidence, summary.completeness);
    }
}

// ============================================================================
// Valuation and Reserve Tests
// ============================================================================

mod valuation_tests {
    use super::*;

    fn value(snapshot: &ClaimSnapshot, code: &str) -> domain_claims::Valuation {
        value_claim(&ValuationInput::from_snapshot(snapshot), lookup(code).rules()).unwrap()
    }

    #[test]
    fn test_repairable_vehicle_valued_at_damage_less_deductible() {
        let valuation = value(&base_snapshot(), "CA");

        assert!(!valuation.total_loss);
        assert_eq!(valuation.gross_value, usd(dec!(1800)));
        assert_eq!(valuation.estimated_value, usd(dec!(1300)));
        assert_eq!(valuation.confidence, dec!(1.0));
    }

    #[test]
    fn test_threshold_declares_total_loss() {
        let mut snapshot = base_snapshot();
        snapshot.estimated_damage = usd(dec!(17000));

        let valuation = value(&snapshot, "CA");

        assert!(valuation.total_loss);
        assert_eq!(valuation.gross_value, usd(dec!(22000)));
        assert_eq!(valuation.estimated_value, usd(dec!(21500)));
    }

    #[test]
    fn test_threshold_depends_on_jurisdiction() {
        let mut snapshot = base_snapshot();
        snapshot.estimated_damage = usd(dec!(17000));

        let valuation = value(&snapshot, "TX");

        assert!(!valuation.total_loss);
        assert_eq!(valuation.estimated_value, usd(dec!(16500)));
    }

    #[test]
    fn test_deductible_floors_value_at_zero() {
        let mut snapshot = base_snapshot();
        snapshot.estimated_damage = usd(dec!(300));

        assert!(value(&snapshot, "CA").estimated_value.is_zero());
    }

    #[test]
    fn test_mixed_currencies_fail() {
        let mut snapshot = base_snapshot();
        snapshot.vehicles[0].actual_cash_value = Money::new(dec!(22000), Currency::EUR);

        let result = value_claim(&ValuationInput::from_snapshot(&snapshot), lookup("CA").rules());

        assert!(matches!(result, Err(ClaimError::Money(_))));
    }

    #[test]
    fn test_simple_claim_reserve() {
        let snapshot = base_snapshot();
        let valuation = value(&snapshot, "CA");
        let severity = score_severity(&SeverityInput::from_snapshot(&snapshot), &SeverityPolicy::default());

        let reserve = recommend_reserve(&valuation, &severity).unwrap();

        assert_eq!(reserve.complexity_factor, dec!(1.0));
        assert_eq!(reserve.amount_for(ReserveType::Indemnity), Some(usd(dec!(1300))));
        assert_eq!(reserve.amount_for(ReserveType::Expense), Some(usd(dec!(150))));
        assert_eq!(reserve.amount_for(ReserveType::LegalExpense), None);
        assert_eq!(reserve.total, usd(dec!(1450)));
    }

    #[test]
    fn test_litigation_adds_legal_reserve() {
        let mut snapshot = base_snapshot();
        snapshot.litigation_indicators = vec!["demand letter".to_string()];
        let valuation = value(&snapshot, "CA");
        let severity = score_severity(&SeverityInput::from_snapshot(&snapshot), &SeverityPolicy::default());

        let reserve = recommend_reserve(&valuation, &severity).unwrap();

        assert_eq!(reserve.amount_for(ReserveType::LegalExpense), Some(usd(dec!(325))));
        assert_eq!(reserve.total, usd(dec!(1775)));
    }
}

// ============================================================================
// Quality Review Tests
// ============================================================================

mod quality_tests {
    use super::*;

    #[test]
    fn test_consistent_snapshot_passes() {
        let review = review_quality(&base_snapshot());

        assert!(review.passed);
        assert_eq!(review.checks.len(), 4);
        assert_eq!(review.confidence, dec!(1));
    }

    #[test]
    fn test_itemization_gap_fails() {
        let mut snapshot = base_snapshot();
        snapshot.estimated_damage = usd(dec!(2500));

        let review = review_quality(&snapshot);

        assert!(!review.passed);
        let failures: Vec<&str> = review.failures().map(|c| c.name.as_str()).collect();
        assert_eq!(failures, vec!["damage_items_reconcile"]);
        assert_eq!(review.confidence, dec!(0.8));
    }

    #[test]
    fn test_vehicle_without_participant_fails() {
        let mut snapshot = base_snapshot();
        snapshot
            .vehicles
            .push(vehicle(PartyRole::OtherParty, vec![DamageLocation::Front]));

        let review = review_quality(&snapshot);

        assert!(review
            .failures()
            .any(|c| c.name == "vehicles_match_participants"));
    }
}

// ============================================================================
// Fraud Tests
// ============================================================================

mod fraud_tests {
    use super::*;

    #[test]
    fn test_clean_claim_scores_zero() {
        let result = assess_fraud(&FraudInput::from_snapshot(&base_snapshot()), &FraudPolicy::default());

        assert_eq!(result.score, 0);
        assert_eq!(result.risk_level, FraudRiskLevel::Low);
        assert!(!result.siu_referral);
        assert_eq!(result.confidence, dec!(0.8));
    }

    #[test]
    fn test_stacked_red_flags_refer_to_siu() {
        let mut snapshot = base_snapshot();
        snapshot.loss_date = Some(date(2023, 6, 10));
        snapshot.loss_description = Some("Want a cash settlement, no witnesses around.".to_string());
        snapshot.prior_claim_count = 4;
        snapshot.documents.clear();

        let result = assess_fraud(&FraudInput::from_snapshot(&snapshot), &FraudPolicy::default());
        let codes: Vec<&str> = result.indicators.iter().map(|i| i.code.as_str()).collect();

        assert_eq!(
            codes,
            vec!["early_loss", "late_report", "frequent_claimant", "suspicious_language", "no_photos"]
        );
        assert_eq!(result.score, 75);
        assert_eq!(result.risk_level, FraudRiskLevel::Severe);
        assert!(result.siu_referral);
    }

    #[test]
    fn test_airbag_with_trivial_damage() {
        let mut snapshot = base_snapshot();
        snapshot.vehicles[0].airbag_deployed = true;
        snapshot.estimated_damage = usd(dec!(600));

        let result = assess_fraud(&FraudInput::from_snapshot(&snapshot), &FraudPolicy::default());

        assert!(result.indicators.iter().any(|i| i.code == "airbag_low_damage"));
        assert_eq!(result.score, 15);
    }
}

// ============================================================================
// Jurisdiction Tests
// ============================================================================

mod jurisdiction_tests {
    use super::*;

    #[test]
    fn test_contributory_jurisdictions() {
        for code in ["AL", "MD", "VA", "NC", "DC"] {
            assert_eq!(
                lookup(code).rules().negligence_regime,
                NegligenceRegime::Contributory,
                "{code}"
            );
        }
    }

    #[test]
    fn test_unknown_code_reports_request() {
        match lookup("Atlantis") {
            domain_claims::JurisdictionLookup::DefaultApplied { requested, rules } => {
                assert_eq!(requested, "Atlantis");
                assert_eq!(rules.code, "DEFAULT");
            }
            other => panic!("expected default, got {other:?}"),
        }
    }
}
