//! Claim reserves
//!
//! Recommends the reserves a claim should carry once it has been valued and
//! scored. The indemnity reserve scales with complexity; expense and legal
//! reserves cover the cost of handling the claim.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::error::ClaimError;
use crate::severity::{ComplexityLevel, SeverityScore};
use crate::valuation::Valuation;

/// Reserve type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveType {
    /// Expected payment on the loss itself
    Indemnity,
    /// Adjusting and appraisal costs
    Expense,
    /// Defense and coverage counsel
    LegalExpense,
}

/// A single recommended reserve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveLine {
    pub reserve_type: ReserveType,
    pub amount: Money,
    pub basis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveRecommendation {
    pub lines: Vec<ReserveLine>,
    pub complexity_factor: Decimal,
    pub total: Money,
}

impl ReserveRecommendation {
    pub fn amount_for(&self, reserve_type: ReserveType) -> Option<Money> {
        self.lines
            .iter()
            .find(|l| l.reserve_type == reserve_type)
            .map(|l| l.amount)
    }
}

/// Multiplier applied to the estimated value for the indemnity reserve
pub fn complexity_factor(level: ComplexityLevel) -> Decimal {
    match level {
        ComplexityLevel::Simple => dec!(1.0),
        ComplexityLevel::Moderate => dec!(1.15),
        ComplexityLevel::Complex => dec!(1.35),
        ComplexityLevel::Critical => dec!(1.6),
    }
}

fn expense_allowance(level: ComplexityLevel) -> Decimal {
    match level {
        ComplexityLevel::Simple => dec!(150),
        ComplexityLevel::Moderate => dec!(500),
        ComplexityLevel::Complex => dec!(1500),
        ComplexityLevel::Critical => dec!(5000),
    }
}

/// Recommends reserves from the valuation and severity results
pub fn recommend_reserve(
    valuation: &Valuation,
    severity: &SeverityScore,
) -> Result<ReserveRecommendation, ClaimError> {
    let currency = valuation.estimated_value.currency();
    let factor = complexity_factor(severity.complexity_level);

    let indemnity = valuation.estimated_value.multiply(factor).round_to_currency();
    let mut lines = vec![
        ReserveLine {
            reserve_type: ReserveType::Indemnity,
            amount: indemnity,
            basis: format!(
                "Estimated value {} x {:?} factor {}",
                valuation.estimated_value, severity.complexity_level, factor
            ),
        },
        ReserveLine {
            reserve_type: ReserveType::Expense,
            amount: Money::new(expense_allowance(severity.complexity_level), currency),
            basis: format!("{:?} claim handling allowance", severity.complexity_level),
        },
    ];
    if severity.sub_scores.litigation > 0 {
        lines.push(ReserveLine {
            reserve_type: ReserveType::LegalExpense,
            amount: indemnity.multiply(dec!(0.25)).round_to_currency(),
            basis: "25% of indemnity for litigation exposure".to_string(),
        });
    }

    let total = Money::sum(lines.iter().map(|l| &l.amount), currency)?;

    Ok(ReserveRecommendation {
        lines,
        complexity_factor: factor,
        total,
    })
}
