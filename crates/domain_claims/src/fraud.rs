//! Fraud pattern screening
//!
//! Sums weighted red-flag indicators into a 0-100 fraud score. The score
//! drives SIU referral; it never denies a claim on its own.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::policy::FraudPolicy;
use crate::snapshot::{ClaimSnapshot, DocumentKind};

const EARLY_LOSS_DAYS: i64 = 30;
const LATE_REPORT_DAYS: i64 = 30;

const SUSPICIOUS_PHRASES: &[&str] = &[
    "cash only",
    "cash settlement",
    "pay in cash",
    "staged",
    "no witnesses",
    "settle quickly",
    "urgent payment",
    "already repaired",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudRiskLevel {
    Low,
    Elevated,
    High,
    Severe,
}

impl FraudRiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => FraudRiskLevel::Severe,
            50..=69 => FraudRiskLevel::High,
            25..=49 => FraudRiskLevel::Elevated,
            _ => FraudRiskLevel::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudIndicator {
    pub code: String,
    pub description: String,
    /// Points added to the fraud score
    pub weight: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAssessment {
    pub score: u8,
    pub risk_level: FraudRiskLevel,
    pub indicators: Vec<FraudIndicator>,
    pub siu_referral: bool,
    /// Confidence in the score, 0 to 1
    pub confidence: Decimal,
}

/// Facts screened for fraud patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudInput {
    pub policy_start: NaiveDate,
    pub loss_date: Option<NaiveDate>,
    pub reported_at: DateTime<Utc>,
    pub prior_claim_count: u32,
    pub airbag_deployed: bool,
    pub estimated_damage: Money,
    pub vehicle_value: Money,
    pub injury_present: bool,
    pub police_report_present: bool,
    pub attorney_represented: bool,
    pub loss_description: Option<String>,
    pub photos_present: bool,
}

impl FraudInput {
    pub fn from_snapshot(snapshot: &ClaimSnapshot) -> Self {
        Self {
            policy_start: snapshot.policy.effective.start,
            loss_date: snapshot.loss_date,
            reported_at: snapshot.reported_at,
            prior_claim_count: snapshot.prior_claim_count,
            airbag_deployed: snapshot.airbag_deployed(),
            estimated_damage: snapshot.estimated_damage,
            vehicle_value: snapshot.insured_vehicle_value(),
            injury_present: snapshot.has_injury(),
            police_report_present: snapshot.police_report.is_some(),
            attorney_represented: snapshot.participants.iter().any(|p| p.attorney_represented),
            loss_description: snapshot.loss_description.clone(),
            photos_present: snapshot.has_document(DocumentKind::Photo),
        }
    }
}

pub fn assess_fraud(input: &FraudInput, policy: &FraudPolicy) -> FraudAssessment {
    let indicators = fraud_indicators(input);
    let total: u32 = indicators.iter().map(|i| u32::from(i.weight)).sum();
    let score = u8::try_from(total.min(100)).unwrap_or(100);

    let mut confidence = dec!(0.6);
    if input.police_report_present {
        confidence += dec!(0.1);
    }
    if input.photos_present {
        confidence += dec!(0.1);
    }
    if input.loss_date.is_some() {
        confidence += dec!(0.1);
    }

    FraudAssessment {
        score,
        risk_level: FraudRiskLevel::from_score(score),
        indicators,
        siu_referral: score >= policy.siu_threshold,
        confidence,
    }
}

fn fraud_indicators(input: &FraudInput) -> Vec<FraudIndicator> {
    let mut indicators = Vec::new();
    let mut flag = |code: &str, weight: u8, description: String| {
        indicators.push(FraudIndicator {
            code: code.to_string(),
            description,
            weight,
        })
    };

    if let Some(loss_date) = input.loss_date {
        let since_inception = (loss_date - input.policy_start).num_days();
        if (0..=EARLY_LOSS_DAYS).contains(&since_inception) {
            flag(
                "early_loss",
                20,
                format!("Loss {since_inception} day(s) after policy inception"),
            );
        }
        let reporting_lag = (input.reported_at.date_naive() - loss_date).num_days();
        if reporting_lag > LATE_REPORT_DAYS {
            flag(
                "late_report",
                15,
                format!("Reported {reporting_lag} day(s) after the loss"),
            );
        }
    }
    if input.prior_claim_count >= 3 {
        flag(
            "frequent_claimant",
            15,
            format!("{} prior claims", input.prior_claim_count),
        );
    }
    if input.airbag_deployed && input.estimated_damage.amount() < dec!(1000) {
        flag(
            "airbag_low_damage",
            15,
            format!("Airbag deployed with damage of {}", input.estimated_damage),
        );
    }
    if input.vehicle_value.is_positive()
        && input.estimated_damage.amount() > input.vehicle_value.amount() * dec!(1.2)
    {
        flag(
            "damage_exceeds_value",
            20,
            format!(
                "Damage {} exceeds vehicle value {}",
                input.estimated_damage, input.vehicle_value
            ),
        );
    }
    if input.injury_present && !input.police_report_present {
        flag(
            "injury_without_police_report",
            10,
            "Injury claimed with no police report".to_string(),
        );
    }
    if input.injury_present && input.estimated_damage.amount() < dec!(1500) {
        flag(
            "injury_low_damage",
            15,
            format!("Injury claimed on damage of {}", input.estimated_damage),
        );
    }
    if input.attorney_represented {
        flag(
            "early_attorney",
            10,
            "Participant represented by counsel at first report".to_string(),
        );
    }
    if let Some(description) = input.loss_description.as_deref() {
        let lowered = description.to_lowercase();
        let hits: Vec<&str> = SUSPICIOUS_PHRASES
            .iter()
            .copied()
            .filter(|p| lowered.contains(p))
            .collect();
        if !hits.is_empty() {
            flag(
                "suspicious_language",
                20,
                format!("Loss description mentions: {}", hits.join(", ")),
            );
        }
    }
    if !input.photos_present {
        flag("no_photos", 5, "No photos of the damage on file".to_string());
    }

    indicators
}
