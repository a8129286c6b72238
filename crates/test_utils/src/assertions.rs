//! Custom Test Assertions
//!
//! Provides assertion helpers for stage results that give more meaningful
//! failure messages than bare `assert!`.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_claims::{EscalationTrigger, LiabilityAssessment, TriggerType};

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that the two liability shares sum to 100
pub fn assert_liability_balanced(assessment: &LiabilityAssessment) {
    let total = u16::from(assessment.insured_liability) + u16::from(assessment.other_party_liability);
    assert_eq!(
        total, 100,
        "Liability split does not sum to 100: insured={}, other={}",
        assessment.insured_liability, assessment.other_party_liability
    );
}

/// Asserts that a confidence lies in [0, 1]
pub fn assert_confidence_in_range(confidence: Decimal) {
    assert!(
        confidence >= Decimal::ZERO && confidence <= Decimal::ONE,
        "Confidence {} outside [0, 1]",
        confidence
    );
}

/// Asserts that a trigger of the given type was raised
pub fn assert_trigger_raised(triggers: &[EscalationTrigger], trigger_type: TriggerType) {
    assert!(
        triggers.iter().any(|t| t.trigger_type == trigger_type),
        "Expected a {:?} trigger, got: {:?}",
        trigger_type,
        triggers.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
}

/// Asserts that no trigger was raised
pub fn assert_no_triggers(triggers: &[EscalationTrigger]) {
    assert!(
        triggers.is_empty(),
        "Expected no triggers, got: {:?}",
        triggers.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use domain_claims::TriggerSeverity;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_approx_eq_within_tolerance() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(100.01), Currency::USD);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "Expected a Fraud trigger")]
    fn test_trigger_raised_panics_when_missing() {
        let triggers = vec![EscalationTrigger::new(
            TriggerType::Routing,
            TriggerSeverity::Low,
            "Routed to StandardAdjuster",
        )];
        assert_trigger_raised(&triggers, TriggerType::Fraud);
    }
}
