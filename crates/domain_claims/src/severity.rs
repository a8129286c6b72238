//! Severity scoring
//!
//! Combines five weighted sub-scores into an overall 0-100 severity score,
//! raises severity flags, and recommends where the claim should be routed.
//!
//! | Sub-score   | Weight |
//! |-------------|--------|
//! | damage      | 0.25   |
//! | injury      | 0.35   |
//! | complexity  | 0.20   |
//! | risk        | 0.15   |
//! | litigation  | 0.05   |

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::policy::SeverityPolicy;
use crate::snapshot::{ClaimSnapshot, InjurySeverity, Telematics};

const DAMAGE_WEIGHT: Decimal = dec!(0.25);
const INJURY_WEIGHT: Decimal = dec!(0.35);
const COMPLEXITY_WEIGHT: Decimal = dec!(0.20);
const RISK_WEIGHT: Decimal = dec!(0.15);
const LITIGATION_WEIGHT: Decimal = dec!(0.05);

/// Everything the severity scorer looks at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityInput {
    pub estimated_damage: Money,
    pub vehicle_count: u32,
    pub injury_present: bool,
    pub injury_severity: Option<InjurySeverity>,
    pub injured_count: u32,
    pub total_loss: bool,
    pub airbag_deployed: bool,
    pub vehicle_age_years: Option<u32>,
    pub vehicle_value: Money,
    pub prior_claim_count: u32,
    pub commercial_use: bool,
    pub litigation_indicators: Vec<String>,
    pub passenger_count: u32,
    pub telematics: Option<Telematics>,
}

impl SeverityInput {
    pub fn from_snapshot(snapshot: &ClaimSnapshot) -> Self {
        Self {
            estimated_damage: snapshot.estimated_damage,
            vehicle_count: u32::try_from(snapshot.vehicles.len()).unwrap_or(u32::MAX),
            injury_present: snapshot.has_injury(),
            injury_severity: snapshot.injury_severity(),
            injured_count: snapshot.injured_count(),
            total_loss: snapshot.total_loss,
            airbag_deployed: snapshot.airbag_deployed(),
            vehicle_age_years: snapshot.insured_vehicle_age(),
            vehicle_value: snapshot.insured_vehicle_value(),
            prior_claim_count: snapshot.prior_claim_count,
            commercial_use: snapshot.vehicles.iter().any(|v| v.commercial_use),
            litigation_indicators: snapshot.litigation_indicators.clone(),
            passenger_count: snapshot.passenger_count,
            telematics: snapshot.telematics,
        }
    }

    /// An assessed severity counts as an injury even when no count was given
    pub fn injury_reported(&self) -> bool {
        self.injury_present || self.injury_severity.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
    Critical,
}

/// Where a claim should be worked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingRecommendation {
    AutoApproval,
    StandardAdjuster,
    SeniorAdjuster,
    LegalReview,
    SalvageSpecialist,
    InjuryDesk,
    BodilyInjuryUnit,
    MajorCaseUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityFlagKind {
    FatalInjury,
    CriticalInjury,
    SeriousInjury,
    InjuryUnassessed,
    TotalLoss,
    AirbagDeployment,
    MultiVehicle,
    CommercialVehicle,
    LitigationRisk,
    FrequentClaimant,
    HighSpeedImpact,
    HighValueClaim,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityFlag {
    pub kind: SeverityFlagKind,
    pub severity: FlagSeverity,
    pub description: String,
}

impl SeverityFlag {
    fn new(kind: SeverityFlagKind, severity: FlagSeverity, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub damage: u8,
    pub injury: u8,
    pub complexity: u8,
    pub risk: u8,
    pub litigation: u8,
}

impl SubScores {
    /// Weighted sum of the sub-scores, rounded half away from zero
    pub fn overall(&self) -> u8 {
        let weighted = DAMAGE_WEIGHT * Decimal::from(self.damage)
            + INJURY_WEIGHT * Decimal::from(self.injury)
            + COMPLEXITY_WEIGHT * Decimal::from(self.complexity)
            + RISK_WEIGHT * Decimal::from(self.risk)
            + LITIGATION_WEIGHT * Decimal::from(self.litigation);
        weighted
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u8()
            .unwrap_or(100)
            .min(100)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityScore {
    pub overall_score: u8,
    pub sub_scores: SubScores,
    pub complexity_level: ComplexityLevel,
    pub flags: Vec<SeverityFlag>,
    pub routing_recommendation: RoutingRecommendation,
    pub escalation_required: bool,
    pub escalation_reasons: Vec<String>,
    /// Confidence in the score, 0-100
    pub confidence: u8,
}

impl SeverityScore {
    pub fn critical_flag_count(&self) -> usize {
        self.flags
            .iter()
            .filter(|f| f.severity == FlagSeverity::Critical)
            .count()
    }

    pub fn has_flag(&self, kind: SeverityFlagKind) -> bool {
        self.flags.iter().any(|f| f.kind == kind)
    }
}

/// Scores a claim's severity
///
/// Pure: the same input and policy always produce the same score.
pub fn score_severity(input: &SeverityInput, policy: &SeverityPolicy) -> SeverityScore {
    let sub_scores = SubScores {
        damage: damage_score(input),
        injury: injury_score(input),
        complexity: complexity_score(input),
        risk: risk_score(input),
        litigation: litigation_score(input),
    };
    let overall_score = sub_scores.overall();
    let flags = severity_flags(input, policy);
    let complexity_level = complexity_level(overall_score, &flags);

    let escalation_reasons = escalation_reasons(input, overall_score, &flags, policy);
    let escalation_required = !escalation_reasons.is_empty();
    let routing_recommendation = route(
        input,
        overall_score,
        complexity_level,
        escalation_required,
        policy,
    );

    SeverityScore {
        overall_score,
        sub_scores,
        complexity_level,
        flags,
        routing_recommendation,
        escalation_required,
        escalation_reasons,
        confidence: confidence(input),
    }
}

fn damage_score(input: &SeverityInput) -> u8 {
    let amount = input.estimated_damage.amount();
    let mut score = if amount <= dec!(1000) {
        10
    } else if amount <= dec!(2500) {
        25
    } else if amount <= dec!(5000) {
        40
    } else if amount <= dec!(10000) {
        60
    } else if amount <= dec!(25000) {
        80
    } else {
        95
    };
    if input.airbag_deployed {
        score = score.max(60);
    }
    if input.total_loss {
        score = score.max(85);
    }
    score
}

fn injury_score(input: &SeverityInput) -> u8 {
    if !input.injury_reported() {
        return 0;
    }
    let base: u32 = match input.injury_severity {
        None => 50,
        Some(InjurySeverity::Minor) => 30,
        Some(InjurySeverity::Moderate) => 55,
        Some(InjurySeverity::Serious) => 80,
        Some(InjurySeverity::Critical) => 90,
        Some(InjurySeverity::Fatal) => 100,
    };
    let additional = input.injured_count.saturating_sub(1).saturating_mul(5);
    clamp_score(base.saturating_add(additional))
}

fn complexity_score(input: &SeverityInput) -> u8 {
    let mut score: u32 = match input.vehicle_count {
        0 | 1 => 10,
        2 => 35,
        3 => 55,
        _ => 75,
    };
    if input.commercial_use {
        score += 15;
    }
    if input.passenger_count >= 3 {
        score += 10;
    }
    if input.total_loss {
        score += 10;
    }
    if input.injured_count >= 2 {
        score += 10;
    }
    clamp_score(score)
}

fn risk_score(input: &SeverityInput) -> u8 {
    let mut score: u32 = match input.prior_claim_count {
        0 => 0,
        1 => 15,
        2 => 30,
        3 | 4 => 50,
        _ => 70,
    };
    if input.vehicle_age_years.is_some_and(|age| age >= 15) {
        score += 10;
    }
    if input.vehicle_value.amount() >= dec!(75000) {
        score += 15;
    }
    if let Some(telematics) = input.telematics {
        score += match telematics.speed_at_impact_mph {
            Some(speed) if speed >= 90 => 30,
            Some(speed) if speed >= 70 => 20,
            Some(speed) if speed >= 50 => 10,
            _ => 0,
        };
        if telematics.harsh_braking {
            score += 5;
        }
    }
    clamp_score(score)
}

fn litigation_score(input: &SeverityInput) -> u8 {
    match input.litigation_indicators.len() {
        0 => 0,
        1 => 60,
        2 => 80,
        _ => 100,
    }
}

fn severity_flags(input: &SeverityInput, policy: &SeverityPolicy) -> Vec<SeverityFlag> {
    use FlagSeverity::*;
    use SeverityFlagKind::*;

    let mut flags = Vec::new();

    if input.injury_reported() {
        match input.injury_severity {
            Some(InjurySeverity::Fatal) => {
                flags.push(SeverityFlag::new(FatalInjury, Critical, "Fatal injury reported"))
            }
            Some(InjurySeverity::Critical) => flags.push(SeverityFlag::new(
                CriticalInjury,
                Critical,
                "Critical injury reported",
            )),
            Some(InjurySeverity::Serious) => {
                flags.push(SeverityFlag::new(SeriousInjury, High, "Serious injury reported"))
            }
            None => flags.push(SeverityFlag::new(
                InjuryUnassessed,
                Medium,
                "Injury reported without a severity assessment",
            )),
            Some(_) => {}
        }
    }
    if input.total_loss {
        flags.push(SeverityFlag::new(TotalLoss, High, "Vehicle reported as a total loss"));
    }
    if input.airbag_deployed {
        flags.push(SeverityFlag::new(AirbagDeployment, Medium, "Airbag deployed"));
    }
    if input.vehicle_count >= 3 {
        flags.push(SeverityFlag::new(
            MultiVehicle,
            Medium,
            format!("{} vehicles involved", input.vehicle_count),
        ));
    }
    if input.commercial_use {
        flags.push(SeverityFlag::new(
            CommercialVehicle,
            Medium,
            "Commercial-use vehicle involved",
        ));
    }
    if !input.litigation_indicators.is_empty() {
        flags.push(SeverityFlag::new(
            LitigationRisk,
            High,
            format!("Litigation indicators: {}", input.litigation_indicators.join(", ")),
        ));
    }
    if input.prior_claim_count >= 3 {
        let severity = if input.prior_claim_count >= 5 { Critical } else { High };
        flags.push(SeverityFlag::new(
            FrequentClaimant,
            severity,
            format!("{} prior claims", input.prior_claim_count),
        ));
    }
    if let Some(speed) = input.telematics.and_then(|t| t.speed_at_impact_mph) {
        if speed >= 70 {
            let severity = if speed >= 90 { Critical } else { High };
            flags.push(SeverityFlag::new(
                HighSpeedImpact,
                severity,
                format!("Impact at {speed} mph"),
            ));
        }
    }
    if input.estimated_damage.amount() > high_value_limit(policy) {
        flags.push(SeverityFlag::new(
            HighValueClaim,
            High,
            format!("Estimated damage {}", input.estimated_damage),
        ));
    }

    flags
}

fn high_value_limit(policy: &SeverityPolicy) -> Decimal {
    policy.auto_approval_ceiling * policy.high_value_multiplier
}

fn complexity_level(overall_score: u8, flags: &[SeverityFlag]) -> ComplexityLevel {
    if flags.iter().any(|f| f.severity == FlagSeverity::Critical) {
        return ComplexityLevel::Critical;
    }
    match overall_score {
        80..=u8::MAX => ComplexityLevel::Critical,
        60..=79 => ComplexityLevel::Complex,
        35..=59 => ComplexityLevel::Moderate,
        _ => ComplexityLevel::Simple,
    }
}

fn escalation_reasons(
    input: &SeverityInput,
    overall_score: u8,
    flags: &[SeverityFlag],
    policy: &SeverityPolicy,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if overall_score >= policy.escalation_score {
        reasons.push(format!(
            "Severity score {} at or above {}",
            overall_score, policy.escalation_score
        ));
    }
    if input.injury_severity == Some(InjurySeverity::Fatal) {
        reasons.push("Fatal injury reported".to_string());
    }
    if !input.litigation_indicators.is_empty() {
        reasons.push(format!(
            "Litigation indicators present: {}",
            input.litigation_indicators.join(", ")
        ));
    }
    if input.estimated_damage.amount() > high_value_limit(policy) {
        reasons.push(format!(
            "Estimated damage {} exceeds {}x the auto-approval ceiling",
            input.estimated_damage, policy.high_value_multiplier
        ));
    }
    let critical = flags
        .iter()
        .filter(|f| f.severity == FlagSeverity::Critical)
        .count();
    if critical >= policy.critical_flag_limit {
        reasons.push(format!("{critical} critical severity flags"));
    }

    reasons
}

fn route(
    input: &SeverityInput,
    overall_score: u8,
    complexity: ComplexityLevel,
    escalation_required: bool,
    policy: &SeverityPolicy,
) -> RoutingRecommendation {
    if escalation_required {
        return if input.litigation_indicators.is_empty() {
            RoutingRecommendation::SeniorAdjuster
        } else {
            RoutingRecommendation::LegalReview
        };
    }
    if input.total_loss {
        return RoutingRecommendation::SalvageSpecialist;
    }
    if input.injury_reported() {
        return match input.injury_severity {
            None | Some(InjurySeverity::Minor) => RoutingRecommendation::InjuryDesk,
            Some(InjurySeverity::Moderate) => RoutingRecommendation::BodilyInjuryUnit,
            Some(_) => RoutingRecommendation::MajorCaseUnit,
        };
    }

    let auto_approvable = overall_score <= policy.auto_approval_max_score
        && complexity == ComplexityLevel::Simple
        && input.vehicle_count <= 1
        && !input.commercial_use
        && input.estimated_damage.amount() <= policy.auto_approval_ceiling;

    if auto_approvable {
        RoutingRecommendation::AutoApproval
    } else {
        RoutingRecommendation::StandardAdjuster
    }
}

/// Starts at 100 and deducts for missing or inconsistent inputs
fn confidence(input: &SeverityInput) -> u8 {
    let mut confidence: i32 = 100;
    if input.injury_reported() && input.injury_severity.is_none() {
        confidence -= 15;
    }
    if input.telematics.is_some() {
        confidence += 5;
    } else {
        confidence -= 10;
    }
    if input.estimated_damage.is_zero() {
        confidence -= 20;
    }
    if input.vehicle_value.is_zero() {
        confidence -= 10;
    }
    u8::try_from(confidence.clamp(0, 100)).unwrap_or(0)
}

fn clamp_score(score: u32) -> u8 {
    u8::try_from(score.min(100)).unwrap_or(100)
}
