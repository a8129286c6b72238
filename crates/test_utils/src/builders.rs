//! Test Data Builders
//!
//! Provides builder patterns for constructing claim snapshots with sensible
//! defaults. Tests specify only the fields their scenario is about.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, Currency, DateRange, PolicyId, VehicleId};
use domain_claims::{
    ClaimSnapshot, Communication, CommunicationKind, DamageItem, DamageLocation, DocumentKind,
    InjuryReport, InjurySeverity, Participant, PartyRole, PoliceReport, PolicyStatus,
    PolicySummary, Telematics, Vehicle, WitnessStatement,
};

use crate::fixtures::{IdFixtures, MoneyFixtures, PartyFixtures, TemporalFixtures};

/// Builder for constructing test claim snapshots
///
/// The default is a clean single-vehicle fender bender in California:
/// $800 of rear damage, no injury, photos and an estimate on file, and the
/// acknowledgment sent the day after the report.
pub struct ClaimSnapshotBuilder {
    snapshot: ClaimSnapshot,
}

impl Default for ClaimSnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimSnapshotBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        let reported_at = TemporalFixtures::reported_at();
        let snapshot = ClaimSnapshot {
            claim_id: IdFixtures::claim_id(1),
            claim_number: "CLM-2024-000101".to_string(),
            currency: Currency::USD,
            jurisdiction_code: "CA".to_string(),
            reported_at,
            policy: PolicySummary {
                policy_id: PolicyId::new(),
                policy_number: "PAU-448812".to_string(),
                status: PolicyStatus::Active,
                effective: DateRange::new(
                    TemporalFixtures::policy_start(),
                    TemporalFixtures::policy_end(),
                )
                .unwrap(),
                deductible: MoneyFixtures::deductible(),
            },
            loss_date: Some(TemporalFixtures::loss_date()),
            loss_description: Some("Backed into a concrete post while parking.".to_string()),
            participants: vec![PartyFixtures::insured()],
            vehicles: vec![vehicle(PartyRole::Insured, vec![DamageLocation::Rear])],
            damage_items: vec![damage_item("Rear bumper cover", dec!(800))],
            estimated_damage: MoneyFixtures::usd(dec!(800)),
            injury: None,
            total_loss: false,
            police_report: None,
            witnesses: Vec::new(),
            telematics: Some(Telematics {
                speed_at_impact_mph: Some(5),
                harsh_braking: false,
            }),
            prior_claim_count: 0,
            litigation_indicators: Vec::new(),
            passenger_count: 0,
            documents: vec![
                PartyFixtures::document(DocumentKind::Photo),
                PartyFixtures::document(DocumentKind::RepairEstimate),
            ],
            communications: vec![Communication {
                kind: CommunicationKind::Acknowledgment,
                sent_at: reported_at + Duration::days(1),
            }],
            investigation_completed_at: None,
            settlement_amount: None,
            payment_issued_at: None,
            coverage_question: false,
            denial_contemplated: false,
        };
        Self { snapshot }
    }

    /// Two-car rear-end collision: the insured was struck from behind
    pub fn rear_end_collision() -> Self {
        Self::new()
            .with_other_party(vec![DamageLocation::Rear], vec![DamageLocation::Front])
            .with_loss_description("Stopped at a light when the car behind hit me.")
            .with_document(DocumentKind::PoliceReport)
            .with_document(DocumentKind::Statement)
    }

    /// Single-vehicle crash with a fatality
    pub fn fatal_injury() -> Self {
        Self::new()
            .with_damage(dec!(18000))
            .with_injury(1, Some(InjurySeverity::Fatal))
            .with_airbag_deployed()
            .with_document(DocumentKind::PoliceReport)
            .with_document(DocumentKind::MedicalRecord)
    }

    /// Sets the claim ID
    pub fn with_claim_id(mut self, id: ClaimId) -> Self {
        self.snapshot.claim_id = id;
        self
    }

    pub fn with_claim_number(mut self, number: impl Into<String>) -> Self {
        self.snapshot.claim_number = number.into();
        self
    }

    pub fn with_jurisdiction(mut self, code: impl Into<String>) -> Self {
        self.snapshot.jurisdiction_code = code.into();
        self
    }

    pub fn with_reported_at(mut self, reported_at: DateTime<Utc>) -> Self {
        self.snapshot.reported_at = reported_at;
        self
    }

    pub fn with_loss_date(mut self, loss_date: Option<NaiveDate>) -> Self {
        self.snapshot.loss_date = loss_date;
        self
    }

    pub fn with_loss_description(mut self, description: impl Into<String>) -> Self {
        self.snapshot.loss_description = Some(description.into());
        self
    }

    /// Moves policy inception, keeping a one-year term
    pub fn with_policy_start(mut self, start: NaiveDate) -> Self {
        let end = start + Duration::days(365);
        if let Ok(range) = DateRange::new(start, end) {
            self.snapshot.policy.effective = range;
        }
        self
    }

    pub fn with_policy_status(mut self, status: PolicyStatus) -> Self {
        self.snapshot.policy.status = status;
        self
    }

    /// Sets the damage estimate and a single matching damage item
    pub fn with_damage(mut self, amount: Decimal) -> Self {
        self.snapshot.estimated_damage = MoneyFixtures::usd(amount);
        self.snapshot.damage_items = vec![damage_item("Collision repair", amount)];
        self
    }

    /// Sets the overall estimate without touching the itemization
    pub fn with_estimate_only(mut self, amount: Decimal) -> Self {
        self.snapshot.estimated_damage = MoneyFixtures::usd(amount);
        self
    }

    pub fn with_injury(mut self, injured_count: u32, severity: Option<InjurySeverity>) -> Self {
        self.snapshot.injury = Some(InjuryReport {
            injured_count,
            severity,
            description: Some("Occupant injured in the collision".to_string()),
        });
        self
    }

    pub fn with_total_loss(mut self) -> Self {
        self.snapshot.total_loss = true;
        self
    }

    pub fn with_airbag_deployed(mut self) -> Self {
        if let Some(vehicle) = self.snapshot.vehicles.first_mut() {
            vehicle.airbag_deployed = true;
        }
        self
    }

    pub fn with_commercial_use(mut self) -> Self {
        if let Some(vehicle) = self.snapshot.vehicles.first_mut() {
            vehicle.commercial_use = true;
        }
        self
    }

    pub fn with_prior_claims(mut self, count: u32) -> Self {
        self.snapshot.prior_claim_count = count;
        self
    }

    pub fn with_litigation(mut self, indicator: impl Into<String>) -> Self {
        self.snapshot.litigation_indicators.push(indicator.into());
        self
    }

    pub fn with_passengers(mut self, count: u32) -> Self {
        self.snapshot.passenger_count = count;
        self
    }

    pub fn with_telematics(mut self, telematics: Option<Telematics>) -> Self {
        self.snapshot.telematics = telematics;
        self
    }

    /// Adds the other driver and both vehicles' damage locations
    pub fn with_other_party(
        mut self,
        insured_damage: Vec<DamageLocation>,
        other_damage: Vec<DamageLocation>,
    ) -> Self {
        self.snapshot
            .participants
            .retain(|p| p.role == PartyRole::Insured);
        self.snapshot.participants.push(PartyFixtures::other_party());
        self.snapshot.vehicles = vec![
            vehicle(PartyRole::Insured, insured_damage),
            vehicle(PartyRole::OtherParty, other_damage),
        ];
        self
    }

    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.snapshot.participants.push(participant);
        self
    }

    /// Records a statement for the participant with `role`
    pub fn with_statement(mut self, role: PartyRole, text: impl Into<String>) -> Self {
        let text = text.into();
        if let Some(participant) = self
            .snapshot
            .participants
            .iter_mut()
            .find(|p| p.role == role)
        {
            participant.statement = Some(text);
        }
        self
    }

    pub fn with_attorney(mut self, role: PartyRole) -> Self {
        if let Some(participant) = self
            .snapshot
            .participants
            .iter_mut()
            .find(|p| p.role == role)
        {
            participant.attorney_represented = true;
        }
        self
    }

    pub fn with_police_report(mut self, report: PoliceReport) -> Self {
        self.snapshot.police_report = Some(report);
        self
    }

    pub fn with_witness(mut self, witness: WitnessStatement) -> Self {
        self.snapshot.witnesses.push(witness);
        self
    }

    pub fn with_document(mut self, kind: DocumentKind) -> Self {
        self.snapshot.documents.push(PartyFixtures::document(kind));
        self
    }

    pub fn without_document(mut self, kind: DocumentKind) -> Self {
        self.snapshot.documents.retain(|d| d.kind != kind);
        self
    }

    /// Replaces the acknowledgment with one sent `days` after the report
    pub fn with_acknowledgment_after(mut self, days: i64) -> Self {
        let sent_at = self.snapshot.reported_at + Duration::days(days);
        self.snapshot
            .communications
            .retain(|c| c.kind != CommunicationKind::Acknowledgment);
        self.snapshot.communications.push(Communication {
            kind: CommunicationKind::Acknowledgment,
            sent_at,
        });
        self
    }

    pub fn without_communications(mut self) -> Self {
        self.snapshot.communications.clear();
        self
    }

    pub fn with_investigation_completed_after(mut self, days: i64) -> Self {
        self.snapshot.investigation_completed_at =
            Some(self.snapshot.reported_at + Duration::days(days));
        self
    }

    pub fn with_settlement(mut self, amount: Decimal) -> Self {
        self.snapshot.settlement_amount = Some(MoneyFixtures::usd(amount));
        self
    }

    pub fn with_coverage_question(mut self) -> Self {
        self.snapshot.coverage_question = true;
        self
    }

    pub fn with_denial_contemplated(mut self) -> Self {
        self.snapshot.denial_contemplated = true;
        self
    }

    /// Builds the snapshot
    pub fn build(self) -> ClaimSnapshot {
        self.snapshot
    }
}

fn vehicle(owner_role: PartyRole, damage_locations: Vec<DamageLocation>) -> Vehicle {
    Vehicle {
        vehicle_id: VehicleId::new(),
        owner_role,
        model_year: 2020,
        actual_cash_value: MoneyFixtures::vehicle_value(),
        damage_locations,
        airbag_deployed: false,
        commercial_use: false,
    }
}

fn damage_item(description: &str, amount: Decimal) -> DamageItem {
    DamageItem {
        description: description.to_string(),
        location: Some(DamageLocation::Rear),
        estimate: MoneyFixtures::usd(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_consistent() {
        let snapshot = ClaimSnapshotBuilder::new().build();
        assert_eq!(snapshot.vehicles.len(), 1);
        assert_eq!(snapshot.estimated_damage, MoneyFixtures::usd(dec!(800)));
        assert!(snapshot.policy.covers(TemporalFixtures::loss_date()));
        assert!(!snapshot.has_injury());
    }

    #[test]
    fn test_rear_end_preset_has_two_sides() {
        let snapshot = ClaimSnapshotBuilder::rear_end_collision().build();
        assert_eq!(snapshot.participants.len(), 2);
        assert!(snapshot.counterparty_vehicle().is_some());
    }

    #[test]
    fn test_acknowledgment_is_replaced() {
        let snapshot = ClaimSnapshotBuilder::new()
            .with_acknowledgment_after(20)
            .build();
        let acks: Vec<_> = snapshot
            .communications
            .iter()
            .filter(|c| c.kind == CommunicationKind::Acknowledgment)
            .collect();
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].sent_at, TemporalFixtures::days_after_report(20));
    }
}
