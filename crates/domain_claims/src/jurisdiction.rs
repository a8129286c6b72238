//! Jurisdiction rules
//!
//! Per-state negligence regimes, regulatory claim-handling deadlines and
//! total-loss thresholds. Lookups never fail: an unknown code resolves to a
//! conservative default regime, and the caller is told the default was used.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How fault-sharing affects recovery in a jurisdiction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegligenceRegime {
    /// Recovery reduced by own share of fault, never barred
    PureComparative,
    /// Recovery barred at 50% or more own fault
    Modified50,
    /// Recovery barred at 51% or more own fault
    Modified51,
    /// Any own fault bars recovery
    Contributory,
}

impl NegligenceRegime {
    /// True if a party carrying `liability_percent` of fault recovers nothing
    pub fn bars_recovery(&self, liability_percent: u8) -> bool {
        match self {
            NegligenceRegime::PureComparative => liability_percent >= 100,
            NegligenceRegime::Modified50 => liability_percent >= 50,
            NegligenceRegime::Modified51 => liability_percent >= 51,
            NegligenceRegime::Contributory => liability_percent > 0,
        }
    }
}

/// Claim-handling rules for one jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionRules {
    pub code: String,
    pub name: String,
    /// Fair claims practices regulation cited on compliance findings
    pub regulation: String,
    pub negligence_regime: NegligenceRegime,
    pub acknowledgment_days: u32,
    pub investigation_days: u32,
    /// Days from report to a coverage decision
    pub decision_days: u32,
    /// Days from the coverage decision to payment
    pub payment_days: u32,
    pub status_update_days: u32,
    pub reservation_of_rights_days: u32,
    /// Damage-to-value ratio at which a vehicle is declared a total loss
    pub total_loss_threshold: Decimal,
}

/// Result of resolving a jurisdiction code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum JurisdictionLookup {
    Found(JurisdictionRules),
    DefaultApplied {
        requested: String,
        rules: JurisdictionRules,
    },
}

impl JurisdictionLookup {
    pub fn rules(&self) -> &JurisdictionRules {
        match self {
            JurisdictionLookup::Found(rules) => rules,
            JurisdictionLookup::DefaultApplied { rules, .. } => rules,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, JurisdictionLookup::DefaultApplied { .. })
    }
}

/// Source of jurisdiction rules consumed by the pipeline
pub trait JurisdictionSource: Send + Sync {
    fn jurisdiction(&self, code: &str) -> JurisdictionLookup;
}

/// The built-in rule table
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticJurisdictionTable;

impl JurisdictionSource for StaticJurisdictionTable {
    fn jurisdiction(&self, code: &str) -> JurisdictionLookup {
        lookup(code)
    }
}

/// Resolves a jurisdiction code against the built-in table (case-insensitive)
pub fn lookup(code: &str) -> JurisdictionLookup {
    let normalized = code.trim().to_ascii_uppercase();
    match RULES.get(normalized.as_str()) {
        Some(rules) => JurisdictionLookup::Found(rules.clone()),
        None => JurisdictionLookup::DefaultApplied {
            requested: code.to_string(),
            rules: default_rules(),
        },
    }
}

/// Conservative fallback: short deadlines and a 51% bar
pub fn default_rules() -> JurisdictionRules {
    JurisdictionRules {
        code: "DEFAULT".to_string(),
        name: "Default regime".to_string(),
        regulation: "NAIC Unfair Claims Settlement Practices Model Regulation".to_string(),
        negligence_regime: NegligenceRegime::Modified51,
        acknowledgment_days: 10,
        investigation_days: 30,
        decision_days: 30,
        payment_days: 5,
        status_update_days: 30,
        reservation_of_rights_days: 30,
        total_loss_threshold: dec!(0.75),
    }
}

struct Row {
    code: &'static str,
    name: &'static str,
    regulation: &'static str,
    regime: NegligenceRegime,
    deadlines: [u32; 6],
    total_loss_threshold: Decimal,
}

impl From<&Row> for JurisdictionRules {
    fn from(row: &Row) -> Self {
        let [ack, investigation, decision, payment, status, ror] = row.deadlines;
        JurisdictionRules {
            code: row.code.to_string(),
            name: row.name.to_string(),
            regulation: row.regulation.to_string(),
            negligence_regime: row.regime,
            acknowledgment_days: ack,
            investigation_days: investigation,
            decision_days: decision,
            payment_days: payment,
            status_update_days: status,
            reservation_of_rights_days: ror,
            total_loss_threshold: row.total_loss_threshold,
        }
    }
}

// deadlines: acknowledgment, investigation, decision, payment, status update, reservation of rights
static RULES: Lazy<HashMap<&'static str, JurisdictionRules>> = Lazy::new(|| {
    use NegligenceRegime::*;
    let rows = [
        Row { code: "AL", name: "Alabama", regulation: "Ala. Admin. Code r. 482-1-125", regime: Contributory, deadlines: [15, 30, 30, 30, 30, 30], total_loss_threshold: dec!(0.60) },
        Row { code: "AZ", name: "Arizona", regulation: "Ariz. Admin. Code R20-6-801", regime: PureComparative, deadlines: [10, 30, 30, 30, 30, 30], total_loss_threshold: dec!(0.75) },
        Row { code: "CA", name: "California", regulation: "Cal. Code Regs. tit. 10, 2695", regime: PureComparative, deadlines: [15, 40, 40, 30, 30, 40], total_loss_threshold: dec!(0.75) },
        Row { code: "CO", name: "Colorado", regulation: "Colo. Rev. Stat. 10-3-1104", regime: Modified50, deadlines: [15, 60, 60, 30, 30, 30], total_loss_threshold: dec!(1.00) },
        Row { code: "DC", name: "District of Columbia", regulation: "D.C. Code 31-2231.17", regime: Contributory, deadlines: [15, 30, 30, 30, 30, 30], total_loss_threshold: dec!(0.75) },
        Row { code: "FL", name: "Florida", regulation: "Fla. Stat. 627.70131", regime: Modified51, deadlines: [14, 60, 90, 20, 30, 30], total_loss_threshold: dec!(0.80) },
        Row { code: "GA", name: "Georgia", regulation: "Ga. Comp. R. & Regs. 120-2-52", regime: Modified50, deadlines: [15, 30, 60, 30, 30, 30], total_loss_threshold: dec!(0.75) },
        Row { code: "IA", name: "Iowa", regulation: "Iowa Admin. Code r. 191-15.41", regime: Modified51, deadlines: [15, 30, 30, 30, 30, 30], total_loss_threshold: dec!(0.70) },
        Row { code: "IL", name: "Illinois", regulation: "Ill. Admin. Code tit. 50, 919", regime: Modified51, deadlines: [15, 30, 45, 30, 21, 45], total_loss_threshold: dec!(0.75) },
        Row { code: "MD", name: "Maryland", regulation: "COMAR 31.15.07", regime: Contributory, deadlines: [15, 45, 45, 30, 30, 30], total_loss_threshold: dec!(0.75) },
        Row { code: "NC", name: "North Carolina", regulation: "N.C. Gen. Stat. 58-63-15(11)", regime: Contributory, deadlines: [30, 30, 30, 30, 30, 30], total_loss_threshold: dec!(0.75) },
        Row { code: "NY", name: "New York", regulation: "N.Y. Comp. Codes R. & Regs. tit. 11, 216", regime: PureComparative, deadlines: [15, 15, 15, 5, 30, 15], total_loss_threshold: dec!(0.75) },
        Row { code: "PA", name: "Pennsylvania", regulation: "31 Pa. Code 146", regime: Modified51, deadlines: [10, 30, 15, 30, 45, 30], total_loss_threshold: dec!(0.75) },
        Row { code: "TX", name: "Texas", regulation: "Tex. Ins. Code ch. 542", regime: Modified51, deadlines: [15, 15, 15, 5, 30, 15], total_loss_threshold: dec!(1.00) },
        Row { code: "VA", name: "Virginia", regulation: "14 Va. Admin. Code 5-400", regime: Contributory, deadlines: [10, 45, 45, 30, 30, 30], total_loss_threshold: dec!(0.75) },
        Row { code: "WA", name: "Washington", regulation: "Wash. Admin. Code 284-30-330", regime: PureComparative, deadlines: [10, 30, 15, 15, 30, 30], total_loss_threshold: dec!(0.75) },
    ];
    rows.iter().map(|row| (row.code, JurisdictionRules::from(row))).collect()
});
