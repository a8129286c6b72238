//! Shared fixtures for domain_claims integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, Currency, DateRange, DocumentId, Money, PartyId, PolicyId, VehicleId};

use domain_claims::snapshot::*;

pub fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn reported_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
}

/// Five days after the report
pub fn as_of() -> DateTime<Utc> {
    reported_at() + Duration::days(5)
}

pub fn insured_participant() -> Participant {
    Participant {
        party_id: PartyId::new(),
        role: PartyRole::Insured,
        name: "Dana Whitfield".to_string(),
        statement: None,
        insurance_carrier: Some("Open Mutual".to_string()),
        attorney_represented: false,
    }
}

pub fn other_participant() -> Participant {
    Participant {
        party_id: PartyId::new(),
        role: PartyRole::OtherParty,
        name: "Lee Okafor".to_string(),
        statement: None,
        insurance_carrier: Some("Coastline Insurance".to_string()),
        attorney_represented: false,
    }
}

pub fn vehicle(owner_role: PartyRole, damage: Vec<DamageLocation>) -> Vehicle {
    Vehicle {
        vehicle_id: VehicleId::new(),
        owner_role,
        model_year: 2020,
        actual_cash_value: usd(dec!(22000)),
        damage_locations: damage,
        airbag_deployed: false,
        commercial_use: false,
    }
}

pub fn document(kind: DocumentKind) -> DocumentMeta {
    DocumentMeta {
        document_id: DocumentId::new(),
        kind,
        received_at: reported_at() + Duration::hours(4),
    }
}

/// A clean single-vehicle fender bender in California
pub fn base_snapshot() -> ClaimSnapshot {
    ClaimSnapshot {
        claim_id: ClaimId::new(),
        claim_number: "CLM-2024-000101".to_string(),
        currency: Currency::USD,
        jurisdiction_code: "CA".to_string(),
        reported_at: reported_at(),
        policy: PolicySummary {
            policy_id: PolicyId::new(),
            policy_number: "PAU-448812".to_string(),
            status: PolicyStatus::Active,
            effective: DateRange::new(date(2023, 6, 1), date(2024, 5, 31)).unwrap(),
            deductible: usd(dec!(500)),
        },
        loss_date: Some(date(2024, 3, 8)),
        loss_description: Some("Backed into a concrete post while parking.".to_string()),
        participants: vec![insured_participant()],
        vehicles: vec![vehicle(PartyRole::Insured, vec![DamageLocation::Rear])],
        damage_items: vec![
            DamageItem {
                description: "Rear bumper cover".to_string(),
                location: Some(DamageLocation::Rear),
                estimate: usd(dec!(1200)),
            },
            DamageItem {
                description: "Paint and blend".to_string(),
                location: Some(DamageLocation::Rear),
                estimate: usd(dec!(600)),
            },
        ],
        estimated_damage: usd(dec!(1800)),
        injury: None,
        total_loss: false,
        police_report: None,
        witnesses: vec![],
        telematics: Some(Telematics {
            speed_at_impact_mph: Some(5),
            harsh_braking: false,
        }),
        prior_claim_count: 0,
        litigation_indicators: vec![],
        passenger_count: 0,
        documents: vec![
            document(DocumentKind::Photo),
            document(DocumentKind::RepairEstimate),
        ],
        communications: vec![Communication {
            kind: CommunicationKind::Acknowledgment,
            sent_at: reported_at() + Duration::days(1),
        }],
        investigation_completed_at: None,
        settlement_amount: None,
        payment_issued_at: None,
        coverage_question: false,
        denial_contemplated: false,
    }
}

/// A two-car collision with both participants and their vehicles
pub fn two_car_snapshot(insured_damage: DamageLocation, other_damage: DamageLocation) -> ClaimSnapshot {
    let mut snapshot = base_snapshot();
    snapshot.participants = vec![insured_participant(), other_participant()];
    snapshot.vehicles = vec![
        vehicle(PartyRole::Insured, vec![insured_damage]),
        vehicle(PartyRole::OtherParty, vec![other_damage]),
    ];
    snapshot.loss_description = Some("Collision at an intersection.".to_string());
    snapshot
}

pub fn witness(at_fault: Option<PartyRole>) -> WitnessStatement {
    WitnessStatement {
        name: "Witness".to_string(),
        identifies_at_fault: at_fault,
        statement: "I saw the collision from the sidewalk.".to_string(),
    }
}
