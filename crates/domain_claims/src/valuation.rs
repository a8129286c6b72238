//! Loss valuation
//!
//! Decides whether the insured vehicle is a total loss under the
//! jurisdiction's threshold and values the claim net of the deductible.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::error::ClaimError;
use crate::jurisdiction::JurisdictionRules;
use crate::snapshot::ClaimSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    pub estimated_damage: Money,
    pub actual_cash_value: Money,
    pub deductible: Money,
    /// Total loss already declared on the claim
    pub total_loss_reported: bool,
}

impl ValuationInput {
    pub fn from_snapshot(snapshot: &ClaimSnapshot) -> Self {
        Self {
            estimated_damage: snapshot.estimated_damage,
            actual_cash_value: snapshot.insured_vehicle_value(),
            deductible: snapshot.policy.deductible,
            total_loss_reported: snapshot.total_loss,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub actual_cash_value: Money,
    /// Damage as a fraction of actual cash value; zero when the value is unknown
    pub damage_ratio: Decimal,
    pub total_loss_threshold: Decimal,
    pub total_loss: bool,
    pub gross_value: Money,
    pub deductible: Money,
    /// Gross value less the deductible, never negative
    pub estimated_value: Money,
    pub confidence: Decimal,
}

pub fn value_claim(input: &ValuationInput, rules: &JurisdictionRules) -> Result<Valuation, ClaimError> {
    input.estimated_damage.ensure_same_currency(&input.actual_cash_value)?;

    let value_known = input.actual_cash_value.is_positive();
    let damage_ratio = if value_known {
        (input.estimated_damage.amount() / input.actual_cash_value.amount()).round_dp(4)
    } else {
        Decimal::ZERO
    };
    let total_loss =
        input.total_loss_reported || (value_known && damage_ratio >= rules.total_loss_threshold);

    let gross_value = if total_loss && value_known {
        input.actual_cash_value
    } else {
        input.estimated_damage
    };
    let estimated_value = gross_value.checked_sub(&input.deductible)?.floor_zero();

    let confidence = match (value_known, input.estimated_damage.is_positive()) {
        (true, true) => dec!(1.0),
        (false, false) => dec!(0.4),
        _ => dec!(0.7),
    };

    Ok(Valuation {
        actual_cash_value: input.actual_cash_value,
        damage_ratio,
        total_loss_threshold: rules.total_loss_threshold,
        total_loss,
        gross_value,
        deductible: input.deductible,
        estimated_value,
        confidence,
    })
}
