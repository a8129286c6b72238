//! Claim snapshot
//!
//! The read-only view of a claim that every scoring stage consumes. Stages
//! never see mutable claim state; they receive an owned snapshot and return
//! their own typed results.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ClaimId, Currency, DateRange, DocumentId, Money, PartyId, PolicyId, VehicleId};

/// Which side of the loss a participant is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Insured,
    OtherParty,
}

impl PartyRole {
    /// The opposite side of the loss
    pub fn counterparty(self) -> Self {
        match self {
            PartyRole::Insured => PartyRole::OtherParty,
            PartyRole::OtherParty => PartyRole::Insured,
        }
    }
}

/// Reported injury severity, mildest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjurySeverity {
    Minor,
    Moderate,
    Serious,
    Critical,
    Fatal,
}

/// Point of impact on a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageLocation {
    Front,
    Rear,
    LeftSide,
    RightSide,
    Roof,
    Undercarriage,
}

impl DamageLocation {
    pub fn is_side(self) -> bool {
        matches!(self, DamageLocation::LeftSide | DamageLocation::RightSide)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Photo,
    PoliceReport,
    RepairEstimate,
    Statement,
    MedicalRecord,
    Invoice,
    Other,
}

/// Outbound correspondence recorded against the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationKind {
    Acknowledgment,
    StatusUpdate,
    ReservationOfRights,
    DenialNotice,
    CoverageDecision,
    PaymentNotice,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Active,
    Lapsed,
    Cancelled,
    Expired,
}

/// Policy details needed for decisioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PolicySummary {
    pub policy_id: PolicyId,
    #[validate(length(min = 1, message = "policy number is required"))]
    pub policy_number: String,
    pub status: PolicyStatus,
    pub effective: DateRange,
    pub deductible: Money,
}

impl PolicySummary {
    /// True if the policy is active and `loss_date` falls in its term
    pub fn covers(&self, loss_date: NaiveDate) -> bool {
        self.status == PolicyStatus::Active && self.effective.contains(loss_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Participant {
    pub party_id: PartyId,
    pub role: PartyRole,
    #[validate(length(min = 1, message = "participant name is required"))]
    pub name: String,
    /// Free-text account of the loss given by this participant
    pub statement: Option<String>,
    /// Carrier insuring this participant, if known
    pub insurance_carrier: Option<String>,
    pub attorney_represented: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Vehicle {
    pub vehicle_id: VehicleId,
    pub owner_role: PartyRole,
    #[validate(range(min = 1900, max = 2100, message = "model year out of range"))]
    pub model_year: i32,
    pub actual_cash_value: Money,
    pub damage_locations: Vec<DamageLocation>,
    pub airbag_deployed: bool,
    pub commercial_use: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DamageItem {
    #[validate(length(min = 1, message = "damage item needs a description"))]
    pub description: String,
    pub location: Option<DamageLocation>,
    pub estimate: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InjuryReport {
    pub injured_count: u32,
    /// Absent when the injury has not been assessed yet
    pub severity: Option<InjurySeverity>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoliceReport {
    pub report_number: String,
    pub citation_issued_to: Option<PartyRole>,
    pub fault_determination: Option<PartyRole>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WitnessStatement {
    pub name: String,
    /// The party the witness says caused the loss, if they said
    pub identifies_at_fault: Option<PartyRole>,
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentMeta {
    pub document_id: DocumentId,
    pub kind: DocumentKind,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Communication {
    pub kind: CommunicationKind,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Telematics {
    pub speed_at_impact_mph: Option<u32>,
    pub harsh_braking: bool,
}

/// Immutable view of a claim as handed to the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ClaimSnapshot {
    pub claim_id: ClaimId,
    #[validate(length(min = 1, message = "claim number is required"))]
    pub claim_number: String,
    pub currency: Currency,
    #[validate(length(min = 2, max = 3, message = "jurisdiction code must be 2-3 characters"))]
    pub jurisdiction_code: String,
    pub reported_at: DateTime<Utc>,
    #[validate(nested)]
    pub policy: PolicySummary,
    #[validate(required(message = "loss date is required"))]
    pub loss_date: Option<NaiveDate>,
    #[validate(
        required(message = "loss description is required"),
        length(min = 1, message = "loss description must not be empty")
    )]
    pub loss_description: Option<String>,
    #[validate(nested)]
    pub participants: Vec<Participant>,
    #[validate(length(min = 1, message = "at least one vehicle is required"), nested)]
    pub vehicles: Vec<Vehicle>,
    #[validate(nested)]
    pub damage_items: Vec<DamageItem>,
    pub estimated_damage: Money,
    pub injury: Option<InjuryReport>,
    pub total_loss: bool,
    pub police_report: Option<PoliceReport>,
    pub witnesses: Vec<WitnessStatement>,
    pub telematics: Option<Telematics>,
    pub prior_claim_count: u32,
    pub litigation_indicators: Vec<String>,
    pub passenger_count: u32,
    pub documents: Vec<DocumentMeta>,
    pub communications: Vec<Communication>,
    pub investigation_completed_at: Option<DateTime<Utc>>,
    /// Proposed settlement, present once a payment is owed
    pub settlement_amount: Option<Money>,
    pub payment_issued_at: Option<DateTime<Utc>>,
    /// Coverage is in question and a reservation of rights is owed
    pub coverage_question: bool,
    /// An adjuster has proposed denying the claim
    pub denial_contemplated: bool,
}

impl ClaimSnapshot {
    pub fn insured_vehicle(&self) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.owner_role == PartyRole::Insured)
    }

    pub fn counterparty_vehicle(&self) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.owner_role == PartyRole::OtherParty)
    }

    /// True when an injury report names an injured person or carries a severity
    pub fn has_injury(&self) -> bool {
        self.injury
            .as_ref()
            .is_some_and(|i| i.injured_count > 0 || i.severity.is_some())
    }

    pub fn injury_severity(&self) -> Option<InjurySeverity> {
        self.injury.as_ref().and_then(|i| i.severity)
    }

    pub fn injured_count(&self) -> u32 {
        self.injury.as_ref().map_or(0, |i| i.injured_count)
    }

    pub fn airbag_deployed(&self) -> bool {
        self.vehicles.iter().any(|v| v.airbag_deployed)
    }

    /// Actual cash value of the insured vehicle, zero if none is listed
    pub fn insured_vehicle_value(&self) -> Money {
        self.insured_vehicle()
            .map(|v| v.actual_cash_value)
            .unwrap_or_else(|| Money::zero(self.currency))
    }

    /// Age of the insured vehicle in whole model years at the loss date
    pub fn insured_vehicle_age(&self) -> Option<u32> {
        let vehicle = self.insured_vehicle()?;
        let loss_year = self.loss_date.map_or(self.reported_at.year(), |d| d.year());
        u32::try_from(loss_year - vehicle.model_year).ok()
    }

    /// True if any other-party participant carries insurance
    pub fn counterparty_insured(&self) -> bool {
        self.participants
            .iter()
            .any(|p| p.role == PartyRole::OtherParty && p.insurance_carrier.is_some())
    }

    pub fn has_document(&self, kind: DocumentKind) -> bool {
        self.documents.iter().any(|d| d.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterparty_flips_role() {
        assert_eq!(PartyRole::Insured.counterparty(), PartyRole::OtherParty);
        assert_eq!(PartyRole::OtherParty.counterparty(), PartyRole::Insured);
    }

    #[test]
    fn test_injury_severity_ordering() {
        assert!(InjurySeverity::Fatal > InjurySeverity::Critical);
        assert!(InjurySeverity::Minor < InjurySeverity::Moderate);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let json = r#"{"report_number":"P-1","citation_issued_to":null,"fault_determination":null,"officer":"x"}"#;
        assert!(serde_json::from_str::<PoliceReport>(json).is_err());
    }
}
