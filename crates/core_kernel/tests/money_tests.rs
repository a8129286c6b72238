//! Unit tests for Money as the claim stages use it
//!
//! Covers deductible netting, fault-share splits, reserve totals,
//! and currency mismatch handling.

use std::cmp::Ordering;

use core_kernel::{Currency, Money, MoneyError};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

// ============================================================================
// Creation Tests
// ============================================================================

mod creation {
    use super::*;

    #[test]
    fn test_new_keeps_four_decimal_places() {
        let m = usd(dec!(100.123456789));
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_zero_is_neither_positive_nor_negative() {
        let m = Money::zero(Currency::CAD);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
        assert_eq!(m.currency(), Currency::CAD);
    }

    #[test]
    fn test_round_to_currency_rounds_half_away_from_zero() {
        assert_eq!(usd(dec!(10.125)).round_to_currency().amount(), dec!(10.13));
        assert_eq!(usd(dec!(-10.125)).round_to_currency().amount(), dec!(-10.13));
    }
}

// ============================================================================
// Deductible and Share Tests
// ============================================================================

mod claim_arithmetic {
    use super::*;

    #[test]
    fn test_deductible_netting_floors_at_zero() {
        let damage = usd(dec!(400));
        let deductible = usd(dec!(500));

        let net = damage.checked_sub(&deductible).unwrap().floor_zero();

        assert!(net.is_zero());
    }

    #[test]
    fn test_deductible_netting_above_deductible() {
        let net = usd(dec!(800)).checked_sub(&usd(dec!(500))).unwrap().floor_zero();
        assert_eq!(net, usd(dec!(300)));
    }

    #[test]
    fn test_fault_split_of_estimate() {
        let estimate = usd(dec!(2500));
        assert_eq!(estimate.share(70), usd(dec!(1750)));
        assert_eq!(estimate.share(30), usd(dec!(750)));
    }

    #[test]
    fn test_reserve_lines_sum() {
        let lines = [usd(dec!(345)), usd(dec!(500)), usd(dec!(86.25))];
        let total = Money::sum(&lines, Currency::USD).unwrap();
        assert_eq!(total, usd(dec!(931.25)));
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total = Money::sum(&Vec::<Money>::new(), Currency::EUR).unwrap();
        assert_eq!(total, Money::zero(Currency::EUR));
    }
}

// ============================================================================
// Currency Mismatch Tests
// ============================================================================

mod currency_mismatch {
    use super::*;

    #[test]
    fn test_mismatch_names_both_currencies() {
        let err = usd(dec!(1))
            .ensure_same_currency(&Money::new(dec!(1), Currency::GBP))
            .unwrap_err();

        assert_eq!(
            err,
            MoneyError::CurrencyMismatch("USD".to_string(), "GBP".to_string())
        );
        assert!(err.to_string().contains("USD"));
        assert!(err.to_string().contains("GBP"));
    }

    #[test]
    fn test_sum_fails_on_foreign_line() {
        let lines = [usd(dec!(10)), Money::new(dec!(10), Currency::AUD)];
        assert!(Money::sum(&lines, Currency::USD).is_err());
    }

    #[test]
    fn test_checked_cmp_same_currency() {
        assert_eq!(
            usd(dec!(5000)).checked_cmp(&usd(dec!(4999.99))).unwrap(),
            Ordering::Greater
        );
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod properties {
    use super::*;

    proptest! {
        #[test]
        fn floor_zero_is_never_negative(cents in -1_000_000i64..1_000_000i64) {
            let m = usd(Decimal::new(cents, 2));
            prop_assert!(!m.floor_zero().is_negative());
        }

        #[test]
        fn add_then_sub_restores_amount(
            a in 0i64..100_000_000i64,
            b in 0i64..100_000_000i64,
        ) {
            let x = usd(Decimal::new(a, 2));
            let y = usd(Decimal::new(b, 2));
            let back = x.checked_add(&y).unwrap().checked_sub(&y).unwrap();
            prop_assert_eq!(back, x);
        }
    }
}
