//! Tunable thresholds for the scoring stages
//!
//! All values deserialize with defaults so a partial configuration only
//! overrides what it names. Monetary thresholds are amounts in the claim's
//! own currency.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityPolicy {
    /// Damage at or below this amount may route to automated approval
    pub auto_approval_ceiling: Decimal,
    /// Highest overall score still eligible for automated approval
    pub auto_approval_max_score: u8,
    /// Overall score at or above which the claim is escalated
    pub escalation_score: u8,
    /// Damage above `ceiling * multiplier` is escalated as high value
    pub high_value_multiplier: Decimal,
    /// Number of critical flags that forces escalation
    pub critical_flag_limit: usize,
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self {
            auto_approval_ceiling: dec!(5000),
            auto_approval_max_score: 35,
            escalation_score: 80,
            high_value_multiplier: dec!(3),
            critical_flag_limit: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiabilityPolicy {
    /// Smallest recovery worth pursuing against the other carrier
    pub subrogation_minimum: Decimal,
    /// Splits closer to even than this margin are reported as disputed
    pub disputed_margin: u8,
    pub confidence_cap: Decimal,
}

impl Default for LiabilityPolicy {
    fn default() -> Self {
        Self {
            subrogation_minimum: dec!(500),
            disputed_margin: 20,
            confidence_cap: dec!(0.95),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudPolicy {
    /// Score at or above which the claim is escalated for fraud review
    pub referral_threshold: u8,
    /// Score at or above which the claim is referred to the SIU
    pub siu_threshold: u8,
}

impl Default for FraudPolicy {
    fn default() -> Self {
        Self {
            referral_threshold: 50,
            siu_threshold: 70,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Settlements at or above this amount fail the sanity check
    pub sanity_ceiling: Decimal,
    /// Fraud scores at or above this fail the fraud clearance check
    pub fraud_threshold: u8,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            sanity_ceiling: dec!(1000000),
            fraud_threshold: 50,
        }
    }
}
