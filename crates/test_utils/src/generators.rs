//! Property-Based Test Generators
//!
//! Provides proptest strategies for scorer inputs and whole snapshots, plus
//! `fake` helpers for free text.

use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money};
use domain_claims::{
    ClaimSnapshot, DamageLocation, InjurySeverity, PartyRole, PoliceReport, SeverityInput,
    Telematics,
};

use crate::builders::ClaimSnapshotBuilder;
use crate::fixtures::MoneyFixtures;

/// Strategy for whole-dollar USD amounts up to $150,000
pub fn usd_amount_strategy() -> impl Strategy<Value = Money> {
    (0i64..=150_000).prop_map(|dollars| Money::new(Decimal::from(dollars), Currency::USD))
}

pub fn injury_severity_strategy() -> impl Strategy<Value = InjurySeverity> {
    prop_oneof![
        Just(InjurySeverity::Minor),
        Just(InjurySeverity::Moderate),
        Just(InjurySeverity::Serious),
        Just(InjurySeverity::Critical),
        Just(InjurySeverity::Fatal),
    ]
}

pub fn damage_location_strategy() -> impl Strategy<Value = DamageLocation> {
    prop_oneof![
        Just(DamageLocation::Front),
        Just(DamageLocation::Rear),
        Just(DamageLocation::LeftSide),
        Just(DamageLocation::RightSide),
        Just(DamageLocation::Roof),
        Just(DamageLocation::Undercarriage),
    ]
}

pub fn party_role_strategy() -> impl Strategy<Value = PartyRole> {
    prop_oneof![Just(PartyRole::Insured), Just(PartyRole::OtherParty)]
}

pub fn telematics_strategy() -> impl Strategy<Value = Option<Telematics>> {
    proptest::option::of((proptest::option::of(0u32..130), any::<bool>()).prop_map(
        |(speed_at_impact_mph, harsh_braking)| Telematics {
            speed_at_impact_mph,
            harsh_braking,
        },
    ))
}

/// Strategy for severity scorer inputs covering every sub-score ladder
pub fn severity_input_strategy() -> impl Strategy<Value = SeverityInput> {
    (
        usd_amount_strategy(),
        1u32..5,
        proptest::option::of(injury_severity_strategy()),
        any::<bool>(),
        any::<bool>(),
        proptest::option::of(0u32..30),
        0u32..7,
        any::<bool>(),
        0usize..4,
        0u32..6,
        telematics_strategy(),
    )
        .prop_map(
            |(
                estimated_damage,
                vehicle_count,
                injury_severity,
                total_loss,
                airbag_deployed,
                vehicle_age_years,
                prior_claim_count,
                commercial_use,
                litigation_count,
                passenger_count,
                telematics,
            )| SeverityInput {
                estimated_damage,
                vehicle_count,
                injury_present: injury_severity.is_some(),
                injury_severity,
                injured_count: u32::from(injury_severity.is_some()),
                total_loss,
                airbag_deployed,
                vehicle_age_years,
                vehicle_value: MoneyFixtures::vehicle_value(),
                prior_claim_count,
                commercial_use,
                litigation_indicators: (0..litigation_count)
                    .map(|i| format!("attorney_letter_{}", i))
                    .collect(),
                passenger_count,
                telematics,
            },
        )
}

/// Strategy for police reports, including empty ones
pub fn police_report_strategy() -> impl Strategy<Value = Option<PoliceReport>> {
    proptest::option::of(
        (
            proptest::option::of(party_role_strategy()),
            proptest::option::of(party_role_strategy()),
        )
            .prop_map(|(citation_issued_to, fault_determination)| PoliceReport {
                report_number: "PR-2024-5531".to_string(),
                citation_issued_to,
                fault_determination,
            }),
    )
}

/// Strategy for two-car snapshots with varied fault evidence
pub fn collision_snapshot_strategy() -> impl Strategy<Value = ClaimSnapshot> {
    (
        damage_location_strategy(),
        damage_location_strategy(),
        police_report_strategy(),
        proptest::collection::vec(proptest::option::of(party_role_strategy()), 0..4),
        100i64..40_000,
    )
        .prop_map(|(insured, other, police_report, witnesses, damage)| {
            let mut builder = ClaimSnapshotBuilder::new()
                .with_other_party(vec![insured], vec![other])
                .with_damage(Decimal::from(damage));
            if let Some(report) = police_report {
                builder = builder.with_police_report(report);
            }
            for at_fault in witnesses {
                builder = builder.with_witness(crate::fixtures::PartyFixtures::witness(at_fault));
            }
            builder.build()
        })
}

/// A random person name
pub fn fake_name() -> String {
    Name().fake()
}

/// A random sentence of a few words, for statements and descriptions
pub fn fake_sentence() -> String {
    Sentence(4..10).fake()
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_collision_snapshots_have_two_vehicles(snapshot in collision_snapshot_strategy()) {
            prop_assert_eq!(snapshot.vehicles.len(), 2);
            prop_assert!(snapshot.estimated_damage.is_positive());
        }
    }

    #[test]
    fn test_fake_text_is_not_empty() {
        assert!(!fake_name().is_empty());
        assert!(!fake_sentence().is_empty());
    }
}
