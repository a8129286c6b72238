//! Claims Domain - Scoring stages for automated claim decisioning
//!
//! Every stage in this crate is a pure function over a [`ClaimSnapshot`]
//! (or an input extracted from one) and returns its own typed result:
//! - Intake review and evidence inventory
//! - Liability split with jurisdictional negligence rules
//! - Severity scoring, valuation and reserve recommendation
//! - Regulatory compliance monitoring and the communications plan
//! - Fraud screening and quality review
//! - Final validation before automated approval
//!
//! Stages never log. Notable findings come back as [`StageEvent`]s for the
//! orchestrator to forward.

pub mod error;
pub mod snapshot;
pub mod jurisdiction;
pub mod escalation;
pub mod events;
pub mod policy;
pub mod intake;
pub mod evidence;
pub mod liability;
pub mod severity;
pub mod valuation;
pub mod reserve;
pub mod compliance;
pub mod communications;
pub mod fraud;
pub mod quality;
pub mod validation;

pub use error::ClaimError;
pub use snapshot::{
    ClaimSnapshot, Communication, CommunicationKind, DamageItem, DamageLocation, DocumentKind,
    DocumentMeta, InjuryReport, InjurySeverity, Participant, PartyRole, PolicyStatus,
    PolicySummary, PoliceReport, Telematics, Vehicle, WitnessStatement,
};
pub use jurisdiction::{
    JurisdictionLookup, JurisdictionRules, JurisdictionSource, NegligenceRegime,
    StaticJurisdictionTable,
};
pub use escalation::{EscalationTrigger, StageName, TriggerSeverity, TriggerType};
pub use events::{EventLevel, StageEvent};
pub use policy::{FraudPolicy, LiabilityPolicy, SeverityPolicy, ValidationPolicy};
pub use intake::{review_intake, IntakeIssue, IntakeReport};
pub use evidence::{summarize_evidence, EvidenceSummary};
pub use liability::{
    assess_liability, FaultIndicator, FavoredParty, LiabilityAssessment, LiabilityInput,
    LiabilityType,
};
pub use severity::{
    score_severity, ComplexityLevel, RoutingRecommendation, SeverityFlag, SeverityFlagKind,
    SeverityInput, SeverityScore,
};
pub use valuation::{value_claim, Valuation, ValuationInput};
pub use reserve::{recommend_reserve, ReserveRecommendation, ReserveType};
pub use compliance::{
    monitor_compliance, ComplianceInput, ComplianceReport, ComplianceStatus,
    RequirementCategory, RequirementStatus, ViolationSeverity,
};
pub use communications::{plan_communications, CommunicationPlan};
pub use fraud::{assess_fraud, FraudAssessment, FraudInput, FraudRiskLevel};
pub use quality::{review_quality, QualityReview};
pub use validation::{
    validate_for_approval, CheckKind, FinalValidation, RejectionReason, ValidationInput,
};
