//! Liability assessment
//!
//! Fault is inferred from weighted indicators gathered from five sources:
//! the police report, the pattern of vehicle damage, participant statements,
//! traffic-violation language, and witnesses. The weighted indicators give
//! the fault split, and the jurisdiction's negligence regime then decides
//! what can be recovered from the other carrier.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::error::ClaimError;
use crate::escalation::StageName;
use crate::events::StageEvent;
use crate::jurisdiction::{JurisdictionRules, NegligenceRegime};
use crate::policy::LiabilityPolicy;
use crate::snapshot::{
    ClaimSnapshot, DamageLocation, PartyRole, PoliceReport, Vehicle, WitnessStatement,
};

const POLICE_CITATION_WEIGHT: Decimal = dec!(0.8);
const POLICE_FAULT_WEIGHT: Decimal = dec!(0.7);
const DAMAGE_PATTERN_WEIGHT: Decimal = dec!(0.7);
const ADMISSION_WEIGHT: Decimal = dec!(0.9);
const BLAME_WEIGHT: Decimal = dec!(0.3);
const WITNESS_BASE_WEIGHT: Decimal = dec!(0.5);
const WITNESS_STEP_WEIGHT: Decimal = dec!(0.1);
const WITNESS_MAX_WEIGHT: Decimal = dec!(0.9);

const ADMISSION_PHRASES: &[&str] = &[
    "my fault",
    "i'm sorry",
    "i am sorry",
    "i didn't see",
    "i did not see",
    "i wasn't paying attention",
    "i was not paying attention",
    "i was looking at my phone",
    "i looked away",
    "i couldn't stop",
    "i could not stop",
];

const BLAME_PHRASES: &[&str] = &[
    "hit me",
    "rear-ended me",
    "rear ended me",
    "cut me off",
    "came out of nowhere",
    "slammed into me",
    "their fault",
    "his fault",
    "her fault",
];

/// (phrase, factor, weight)
const VIOLATIONS: &[(&str, &str, Decimal)] = &[
    ("ran a red light", "red_light_violation", dec!(0.95)),
    ("ran the red light", "red_light_violation", dec!(0.95)),
    ("ran through the red", "red_light_violation", dec!(0.95)),
    ("wrong way", "wrong_way_driving", dec!(0.95)),
    ("drunk", "impaired_driving", dec!(0.95)),
    ("intoxicated", "impaired_driving", dec!(0.95)),
    ("ran a stop sign", "stop_sign_violation", dec!(0.9)),
    ("ran the stop sign", "stop_sign_violation", dec!(0.9)),
    ("failed to yield", "failure_to_yield", dec!(0.8)),
    ("didn't yield", "failure_to_yield", dec!(0.8)),
    ("did not yield", "failure_to_yield", dec!(0.8)),
    ("illegal u-turn", "illegal_u_turn", dec!(0.75)),
    ("tailgating", "following_too_closely", dec!(0.7)),
    ("following too closely", "following_too_closely", dec!(0.7)),
    ("texting", "distracted_driving", dec!(0.7)),
    ("speeding", "speeding", dec!(0.6)),
];

const NEGATORS: &[&str] = &["not", "never", "no"];
const NEGATION_WINDOW: usize = 3;

const FIRST_PERSON: &[&str] = &["i", "i'm", "i'd", "i've", "we", "we're"];
const THIRD_PERSON: &[&str] = &[
    "he", "she", "they", "he'd", "she'd", "they'd", "driver", "vehicle", "car", "truck",
    "motorist", "suv", "van",
];

/// Which party an indicator favors, i.e. points away from as being at fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoredParty {
    Insured,
    OtherParty,
    Neutral,
}

impl From<PartyRole> for FavoredParty {
    fn from(role: PartyRole) -> Self {
        match role {
            PartyRole::Insured => FavoredParty::Insured,
            PartyRole::OtherParty => FavoredParty::OtherParty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorSource {
    PoliceReport,
    DamagePattern,
    Statement,
    TrafficViolation,
    Witness,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultIndicator {
    pub factor: String,
    /// Strength of the indicator, 0 to 1
    pub weight: Decimal,
    pub favored_party: FavoredParty,
    pub source: IndicatorSource,
}

impl FaultIndicator {
    fn new(
        factor: impl Into<String>,
        weight: Decimal,
        favored_party: FavoredParty,
        source: IndicatorSource,
    ) -> Self {
        Self {
            factor: factor.into(),
            weight,
            favored_party,
            source,
        }
    }

    /// An indicator that the given role caused the loss
    fn against(
        role: PartyRole,
        factor: impl Into<String>,
        weight: Decimal,
        source: IndicatorSource,
    ) -> Self {
        Self::new(factor, weight, role.counterparty().into(), source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiabilityType {
    Clear,
    Shared,
    Disputed,
    Undetermined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyStatement {
    pub role: PartyRole,
    pub text: String,
}

/// Everything the liability assessor looks at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityInput {
    pub police_report: Option<PoliceReport>,
    pub insured_damage: Vec<DamageLocation>,
    pub other_party_damage: Vec<DamageLocation>,
    pub statements: Vec<PartyStatement>,
    /// The insured's own account of the loss
    pub loss_description: Option<String>,
    pub witnesses: Vec<WitnessStatement>,
    pub claim_amount: Money,
    pub counterparty_insured: bool,
}

impl LiabilityInput {
    pub fn from_snapshot(snapshot: &ClaimSnapshot) -> Self {
        let damage = |vehicle: Option<&Vehicle>| {
            vehicle.map(|v| v.damage_locations.clone()).unwrap_or_default()
        };
        Self {
            police_report: snapshot.police_report.clone(),
            insured_damage: damage(snapshot.insured_vehicle()),
            other_party_damage: damage(snapshot.counterparty_vehicle()),
            statements: snapshot
                .participants
                .iter()
                .filter_map(|p| {
                    p.statement.as_ref().map(|text| PartyStatement {
                        role: p.role,
                        text: text.clone(),
                    })
                })
                .collect(),
            loss_description: snapshot.loss_description.clone(),
            witnesses: snapshot.witnesses.clone(),
            claim_amount: snapshot.estimated_damage,
            counterparty_insured: snapshot.counterparty_insured(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityAssessment {
    /// Percentage of fault carried by the insured
    pub insured_liability: u8,
    /// Percentage of fault carried by the other party; always `100 - insured_liability`
    pub other_party_liability: u8,
    pub liability_type: LiabilityType,
    pub jurisdiction_code: String,
    pub state_rule: NegligenceRegime,
    pub recovery_potential: Money,
    pub subrogation_recommended: bool,
    pub indicators: Vec<FaultIndicator>,
    /// Confidence in the split, 0 to 1
    pub confidence: Decimal,
    pub events: Vec<StageEvent>,
}

/// Assesses fault and recovery potential for a claim
///
/// # Arguments
///
/// * `input` - Liability evidence extracted from the claim snapshot
/// * `rules` - Rules of the jurisdiction where the loss occurred
/// * `policy` - Subrogation and dispute thresholds
///
/// # Returns
///
/// An assessment whose two liability percentages always sum to 100
pub fn assess_liability(
    input: &LiabilityInput,
    rules: &JurisdictionRules,
    policy: &LiabilityPolicy,
) -> Result<LiabilityAssessment, ClaimError> {
    let indicators = gather_indicators(input);
    let mut events = Vec::new();

    let (insured_liability, liability_type) = match split_liability(&indicators) {
        Some(insured) => {
            let difference = (i16::from(insured) - i16::from(100 - insured)).unsigned_abs();
            let liability_type = if insured == 0 || insured == 100 {
                LiabilityType::Clear
            } else if difference < u16::from(policy.disputed_margin) {
                LiabilityType::Disputed
            } else {
                LiabilityType::Shared
            };
            (insured, liability_type)
        }
        None => {
            events.push(StageEvent::warning(
                StageName::Liability,
                "no_directional_indicators",
                "No indicator points to either party; defaulting to an even split",
            ));
            (50, LiabilityType::Undetermined)
        }
    };
    let other_party_liability = 100 - insured_liability;

    let regime = rules.negligence_regime;
    let recovery_potential = if regime.bars_recovery(insured_liability) {
        if other_party_liability > 0 {
            events.push(StageEvent::info(
                StageName::Liability,
                "recovery_barred",
                format!(
                    "{:?} rule in {} bars recovery at {}% insured fault",
                    regime, rules.code, insured_liability
                ),
            ));
        }
        Money::zero(input.claim_amount.currency())
    } else {
        input.claim_amount.share(other_party_liability)
    };

    let subrogation_recommended = other_party_liability >= 50
        && input.claim_amount.amount() >= policy.subrogation_minimum
        && recovery_potential.is_positive()
        && (input.counterparty_insured || other_party_liability >= 75);

    let confidence = confidence(input, &indicators, policy);

    Ok(LiabilityAssessment {
        insured_liability,
        other_party_liability,
        liability_type,
        jurisdiction_code: rules.code.clone(),
        state_rule: regime,
        recovery_potential,
        subrogation_recommended,
        indicators,
        confidence,
        events,
    })
}

/// Collects fault indicators from every evidence source
pub fn gather_indicators(input: &LiabilityInput) -> Vec<FaultIndicator> {
    let mut indicators = Vec::new();
    police_indicators(input.police_report.as_ref(), &mut indicators);
    damage_pattern_indicators(&input.insured_damage, &input.other_party_damage, &mut indicators);

    let mut accounts: Vec<(PartyRole, &str)> = input
        .statements
        .iter()
        .map(|s| (s.role, s.text.as_str()))
        .collect();
    if let Some(description) = input.loss_description.as_deref() {
        accounts.push((PartyRole::Insured, description));
    }
    for (speaker, text) in &accounts {
        statement_indicators(*speaker, text, &mut indicators);
    }
    violation_indicators(&accounts, &mut indicators);

    witness_indicators(&input.witnesses, &mut indicators);
    indicators
}

/// Insured share of fault from the directional indicators, or `None` if there are none
pub fn split_liability(indicators: &[FaultIndicator]) -> Option<u8> {
    let mut against_insured = Decimal::ZERO;
    let mut total = Decimal::ZERO;
    for indicator in indicators {
        match indicator.favored_party {
            FavoredParty::OtherParty => {
                against_insured += indicator.weight;
                total += indicator.weight;
            }
            FavoredParty::Insured => total += indicator.weight,
            FavoredParty::Neutral => {}
        }
    }
    if total.is_zero() {
        return None;
    }
    let percent = (dec!(100) * against_insured / total)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or(100);
    Some(percent.min(100))
}

fn police_indicators(report: Option<&PoliceReport>, out: &mut Vec<FaultIndicator>) {
    let Some(report) = report else { return };
    if let Some(cited) = report.citation_issued_to {
        out.push(FaultIndicator::against(
            cited,
            "police_citation",
            POLICE_CITATION_WEIGHT,
            IndicatorSource::PoliceReport,
        ));
    }
    if let Some(at_fault) = report.fault_determination {
        out.push(FaultIndicator::against(
            at_fault,
            "police_fault_determination",
            POLICE_FAULT_WEIGHT,
            IndicatorSource::PoliceReport,
        ));
    }
}

fn damage_pattern_indicators(
    insured: &[DamageLocation],
    other: &[DamageLocation],
    out: &mut Vec<FaultIndicator>,
) {
    let has = |locations: &[DamageLocation], wanted: DamageLocation| locations.contains(&wanted);
    let has_side = |locations: &[DamageLocation]| locations.iter().any(|l| l.is_side());

    let indicator = if has(insured, DamageLocation::Rear) && has(other, DamageLocation::Front) {
        // insured was struck from behind
        Some(FaultIndicator::against(
            PartyRole::OtherParty,
            "rear_end_impact",
            DAMAGE_PATTERN_WEIGHT,
            IndicatorSource::DamagePattern,
        ))
    } else if has(insured, DamageLocation::Front) && has(other, DamageLocation::Rear) {
        Some(FaultIndicator::against(
            PartyRole::Insured,
            "front_to_rear_impact",
            DAMAGE_PATTERN_WEIGHT,
            IndicatorSource::DamagePattern,
        ))
    } else if (has_side(insured) && has(other, DamageLocation::Front))
        || (has(insured, DamageLocation::Front) && has_side(other))
    {
        Some(FaultIndicator::new(
            "broadside_impact",
            DAMAGE_PATTERN_WEIGHT,
            FavoredParty::Neutral,
            IndicatorSource::DamagePattern,
        ))
    } else {
        None
    };
    out.extend(indicator);
}

fn statement_indicators(speaker: PartyRole, text: &str, out: &mut Vec<FaultIndicator>) {
    let text = normalize(text);
    let role = role_label(speaker);
    if mentions_affirmed(&text, ADMISSION_PHRASES) {
        out.push(FaultIndicator::against(
            speaker,
            format!("admission_by_{role}"),
            ADMISSION_WEIGHT,
            IndicatorSource::Statement,
        ));
    }
    if mentions_affirmed(&text, BLAME_PHRASES) {
        // self-serving, so weighted low
        out.push(FaultIndicator::against(
            speaker.counterparty(),
            format!("blame_by_{role}"),
            BLAME_WEIGHT,
            IndicatorSource::Statement,
        ));
    }
}

/// One indicator per violation and offending party across all accounts
fn violation_indicators(accounts: &[(PartyRole, &str)], out: &mut Vec<FaultIndicator>) {
    let mut seen: Vec<(&str, PartyRole)> = Vec::new();
    for (speaker, text) in accounts {
        for sentence in normalize(text).split(['.', '!', '?', ';']) {
            for (phrase, factor, weight) in VIOLATIONS {
                let Some((position, _)) = sentence
                    .match_indices(phrase)
                    .find(|(position, _)| !negated(sentence, *position))
                else {
                    continue;
                };
                let offender = if first_person_subject(&sentence[..position]) {
                    *speaker
                } else {
                    speaker.counterparty()
                };
                if seen.contains(&(*factor, offender)) {
                    continue;
                }
                seen.push((*factor, offender));
                out.push(FaultIndicator::against(
                    offender,
                    *factor,
                    *weight,
                    IndicatorSource::TrafficViolation,
                ));
            }
        }
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}

/// True if any phrase occurs at least once without a negator in front of it
fn mentions_affirmed(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| {
        text.match_indices(phrase)
            .any(|(position, _)| !negated(text, position))
    })
}

/// True if one of the few words before `position`, within the same clause,
/// is a negator ("not my fault", "i wasn't speeding")
fn negated(text: &str, position: usize) -> bool {
    let clause = text[..position]
        .rsplit(['.', '!', '?', ';', ','])
        .next()
        .unwrap_or_default();
    clause
        .split_whitespace()
        .rev()
        .take(NEGATION_WINDOW)
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .any(|word| NEGATORS.contains(&word) || word.ends_with("n't"))
}

/// True if the nearest subject before a phrase is the speaker
fn first_person_subject(prefix: &str) -> bool {
    prefix
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .rev()
        .find_map(|word| {
            if FIRST_PERSON.contains(&word) {
                Some(true)
            } else if THIRD_PERSON.contains(&word) {
                Some(false)
            } else {
                None
            }
        })
        .unwrap_or(false)
}

fn witness_indicators(witnesses: &[WitnessStatement], out: &mut Vec<FaultIndicator>) {
    let blaming = |role: PartyRole| {
        witnesses
            .iter()
            .filter(|w| w.identifies_at_fault == Some(role))
            .count()
    };
    let against_insured = blaming(PartyRole::Insured);
    let against_other = blaming(PartyRole::OtherParty);

    if against_insured == 0 && against_other == 0 {
        return;
    }
    if against_insured == against_other {
        out.push(FaultIndicator::new(
            "witnesses_split",
            WITNESS_BASE_WEIGHT,
            FavoredParty::Neutral,
            IndicatorSource::Witness,
        ));
        return;
    }

    let (at_fault, majority) = if against_insured > against_other {
        (PartyRole::Insured, against_insured)
    } else {
        (PartyRole::OtherParty, against_other)
    };
    let weight = (WITNESS_BASE_WEIGHT + WITNESS_STEP_WEIGHT * Decimal::from(majority))
        .min(WITNESS_MAX_WEIGHT);
    out.push(FaultIndicator::against(
        at_fault,
        format!("witness_majority_{}", role_label(at_fault)),
        weight,
        IndicatorSource::Witness,
    ));
}

fn confidence(
    input: &LiabilityInput,
    indicators: &[FaultIndicator],
    policy: &LiabilityPolicy,
) -> Decimal {
    let count = Decimal::from(indicators.len());
    let mut confidence = dec!(0.40) + (dec!(0.05) * count).min(dec!(0.20));
    if !indicators.is_empty() {
        let mean = indicators.iter().map(|i| i.weight).sum::<Decimal>() / count;
        confidence += dec!(0.15) * mean;
    }
    if input.police_report.is_some() {
        confidence += dec!(0.10);
    }
    if !input.witnesses.is_empty() {
        confidence += dec!(0.05);
    }
    confidence.min(policy.confidence_cap).round_dp(4)
}

fn role_label(role: PartyRole) -> &'static str {
    match role {
        PartyRole::Insured => "insured",
        PartyRole::OtherParty => "other_party",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_person_subject_uses_nearest_subject() {
        assert!(first_person_subject("i was late and i "));
        assert!(!first_person_subject("i was stopped when the other driver "));
        assert!(!first_person_subject(""));
    }

    #[test]
    fn test_negated_looks_only_at_the_same_clause() {
        let text = "it was not my fault";
        assert!(negated(text, text.find("my fault").unwrap()));

        let text = "i did not stop. my fault";
        assert!(!negated(text, text.find("my fault").unwrap()));

        let text = "no, it was my fault";
        assert!(!negated(text, text.find("my fault").unwrap()));
    }

    #[test]
    fn test_negator_inside_phrase_is_not_a_denial() {
        assert!(mentions_affirmed("sorry, i didn't see them", ADMISSION_PHRASES));
        assert!(!mentions_affirmed("i wasn't sorry and it was never my fault", &["my fault"]));
    }

    #[test]
    fn test_split_ignores_neutral_indicators() {
        let indicators = vec![
            FaultIndicator::new("a", dec!(0.7), FavoredParty::Neutral, IndicatorSource::DamagePattern),
            FaultIndicator::new("b", dec!(0.8), FavoredParty::Insured, IndicatorSource::PoliceReport),
        ];
        assert_eq!(split_liability(&indicators), Some(0));
    }

    #[test]
    fn test_split_none_without_directional_indicators() {
        let indicators = vec![FaultIndicator::new(
            "witnesses_split",
            dec!(0.5),
            FavoredParty::Neutral,
            IndicatorSource::Witness,
        )];
        assert_eq!(split_liability(&indicators), None);
    }
}
