//! Append-only result ledger
//!
//! Every stage of a run records exactly one outcome here, keyed by stage
//! name. Entries are never edited or removed; appending returns a new
//! ledger value so earlier states stay valid for replay and audit.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_claims::{
    CommunicationPlan, ComplianceReport, EvidenceSummary, FinalValidation, FraudAssessment,
    IntakeReport, LiabilityAssessment, QualityReview, ReserveRecommendation, SeverityScore,
    StageEvent, StageName, Valuation,
};

use crate::error::DecisioningError;
use crate::phase::Phase;

/// The typed result of one stage invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "result", rename_all = "snake_case")]
pub enum StageOutcome {
    Intake(IntakeReport),
    Liability(LiabilityAssessment),
    Evidence(EvidenceSummary),
    Severity(SeverityScore),
    Valuation(Valuation),
    Reserve(ReserveRecommendation),
    Compliance(ComplianceReport),
    Communications(CommunicationPlan),
    Fraud(FraudAssessment),
    QualityReview(QualityReview),
    FinalValidation(FinalValidation),
}

impl StageOutcome {
    pub fn stage(&self) -> StageName {
        match self {
            StageOutcome::Intake(_) => StageName::Intake,
            StageOutcome::Liability(_) => StageName::Liability,
            StageOutcome::Evidence(_) => StageName::Evidence,
            StageOutcome::Severity(_) => StageName::Severity,
            StageOutcome::Valuation(_) => StageName::Valuation,
            StageOutcome::Reserve(_) => StageName::Reserve,
            StageOutcome::Compliance(_) => StageName::Compliance,
            StageOutcome::Communications(_) => StageName::Communications,
            StageOutcome::Fraud(_) => StageName::Fraud,
            StageOutcome::QualityReview(_) => StageName::QualityReview,
            StageOutcome::FinalValidation(_) => StageName::FinalValidation,
        }
    }

    /// Stage confidence on a 0 to 1 scale
    ///
    /// Scores reported on 0..100 are rescaled. Reserve and communications
    /// outcomes are derived figures and carry no confidence of their own.
    pub fn confidence(&self) -> Option<Decimal> {
        let hundred = Decimal::ONE_HUNDRED;
        match self {
            StageOutcome::Intake(r) => Some(r.confidence),
            StageOutcome::Liability(r) => Some(r.confidence),
            StageOutcome::Evidence(r) => Some(r.confidence),
            StageOutcome::Severity(r) => Some(Decimal::from(r.confidence) / hundred),
            StageOutcome::Valuation(r) => Some(r.confidence),
            StageOutcome::Reserve(_) => None,
            StageOutcome::Compliance(r) => Some(Decimal::from(r.score) / hundred),
            StageOutcome::Communications(_) => None,
            StageOutcome::Fraud(r) => Some(r.confidence),
            StageOutcome::QualityReview(r) => Some(r.confidence),
            StageOutcome::FinalValidation(r) => Some(Decimal::from(r.confidence) / hundred),
        }
    }

    /// Events the stage reported alongside its result
    pub fn events(&self) -> &[StageEvent] {
        match self {
            StageOutcome::Intake(r) => &r.events,
            StageOutcome::Liability(r) => &r.events,
            StageOutcome::Compliance(r) => &r.events,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub phase: Phase,
    pub outcome: StageOutcome,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(phase: Phase, outcome: StageOutcome, recorded_at: DateTime<Utc>) -> Self {
        Self {
            phase,
            outcome,
            recorded_at,
        }
    }

    pub fn stage(&self) -> StageName {
        self.outcome.stage()
    }
}

/// Stage outcomes recorded during one run
///
/// # Invariants
///
/// - At most one entry per stage
/// - Entries are never replaced or removed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultLedger {
    entries: BTreeMap<StageName, LedgerEntry>,
}

impl ResultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a ledger with `entry` added
    ///
    /// # Errors
    ///
    /// Returns `DuplicateStage` if the stage already has an entry
    pub fn append(&self, entry: LedgerEntry) -> Result<Self, DecisioningError> {
        let stage = entry.stage();
        if self.entries.contains_key(&stage) {
            return Err(DecisioningError::DuplicateStage(stage));
        }
        let mut entries = self.entries.clone();
        entries.insert(stage, entry);
        Ok(Self { entries })
    }

    pub fn get(&self, stage: StageName) -> Option<&LedgerEntry> {
        self.entries.get(&stage)
    }

    pub fn contains(&self, stage: StageName) -> bool {
        self.entries.contains_key(&stage)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.values()
    }

    /// Per-stage confidences, skipping stages without one
    pub fn confidences(&self) -> Vec<Decimal> {
        self.entries
            .values()
            .filter_map(|e| e.outcome.confidence())
            .collect()
    }

    /// Arithmetic mean of recorded confidences, rounded to four places
    pub fn aggregate_confidence(&self) -> Option<Decimal> {
        let confidences = self.confidences();
        if confidences.is_empty() {
            return None;
        }
        let total: Decimal = confidences.iter().sum();
        Some((total / Decimal::from(confidences.len())).round_dp(4))
    }

    pub fn intake(&self) -> Option<&IntakeReport> {
        match self.get(StageName::Intake).map(|e| &e.outcome) {
            Some(StageOutcome::Intake(r)) => Some(r),
            _ => None,
        }
    }

    pub fn liability(&self) -> Option<&LiabilityAssessment> {
        match self.get(StageName::Liability).map(|e| &e.outcome) {
            Some(StageOutcome::Liability(r)) => Some(r),
            _ => None,
        }
    }

    pub fn evidence(&self) -> Option<&EvidenceSummary> {
        match self.get(StageName::Evidence).map(|e| &e.outcome) {
            Some(StageOutcome::Evidence(r)) => Some(r),
            _ => None,
        }
    }

    pub fn severity(&self) -> Option<&SeverityScore> {
        match self.get(StageName::Severity).map(|e| &e.outcome) {
            Some(StageOutcome::Severity(r)) => Some(r),
            _ => None,
        }
    }

    pub fn valuation(&self) -> Option<&Valuation> {
        match self.get(StageName::Valuation).map(|e| &e.outcome) {
            Some(StageOutcome::Valuation(r)) => Some(r),
            _ => None,
        }
    }

    pub fn reserve(&self) -> Option<&ReserveRecommendation> {
        match self.get(StageName::Reserve).map(|e| &e.outcome) {
            Some(StageOutcome::Reserve(r)) => Some(r),
            _ => None,
        }
    }

    pub fn compliance(&self) -> Option<&ComplianceReport> {
        match self.get(StageName::Compliance).map(|e| &e.outcome) {
            Some(StageOutcome::Compliance(r)) => Some(r),
            _ => None,
        }
    }

    pub fn communications(&self) -> Option<&CommunicationPlan> {
        match self.get(StageName::Communications).map(|e| &e.outcome) {
            Some(StageOutcome::Communications(r)) => Some(r),
            _ => None,
        }
    }

    pub fn fraud(&self) -> Option<&FraudAssessment> {
        match self.get(StageName::Fraud).map(|e| &e.outcome) {
            Some(StageOutcome::Fraud(r)) => Some(r),
            _ => None,
        }
    }

    pub fn quality_review(&self) -> Option<&QualityReview> {
        match self.get(StageName::QualityReview).map(|e| &e.outcome) {
            Some(StageOutcome::QualityReview(r)) => Some(r),
            _ => None,
        }
    }

    pub fn final_validation(&self) -> Option<&FinalValidation> {
        match self.get(StageName::FinalValidation).map(|e| &e.outcome) {
            Some(StageOutcome::FinalValidation(r)) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quality(confidence: Decimal) -> LedgerEntry {
        LedgerEntry::new(
            Phase::QualityAssurance,
            StageOutcome::QualityReview(QualityReview {
                checks: Vec::new(),
                passed: true,
                confidence,
            }),
            Utc::now(),
        )
    }

    #[test]
    fn test_append_returns_new_ledger() {
        let empty = ResultLedger::new();
        let one = empty.append(quality(dec!(0.8))).unwrap();

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert!(one.quality_review().is_some());
        assert!(one.fraud().is_none());
    }

    #[test]
    fn test_duplicate_stage_rejected() {
        let ledger = ResultLedger::new().append(quality(dec!(0.8))).unwrap();
        let result = ledger.append(quality(dec!(0.4)));

        assert!(matches!(
            result,
            Err(DecisioningError::DuplicateStage(StageName::QualityReview))
        ));
        assert_eq!(ledger.quality_review().unwrap().confidence, dec!(0.8));
    }

    #[test]
    fn test_aggregate_confidence_of_empty_ledger() {
        assert_eq!(ResultLedger::new().aggregate_confidence(), None);
    }
}
