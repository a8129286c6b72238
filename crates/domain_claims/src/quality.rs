//! Quality review
//!
//! Internal-consistency checks on the snapshot. A failed check does not
//! change any score; it sends the claim to a human.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::snapshot::ClaimSnapshot;

/// Allowed gap between itemized damage and the overall estimate
const ITEMIZATION_TOLERANCE: Decimal = dec!(0.10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCheck {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReview {
    pub checks: Vec<QualityCheck>,
    pub passed: bool,
    pub confidence: Decimal,
}

impl QualityReview {
    pub fn failures(&self) -> impl Iterator<Item = &QualityCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

pub fn review_quality(snapshot: &ClaimSnapshot) -> QualityReview {
    let checks = vec![
        damage_items_reconcile(snapshot),
        vehicles_match_participants(snapshot),
        loss_precedes_report(snapshot),
        injury_assessed(snapshot),
    ];
    let failures = checks.iter().filter(|c| !c.passed).count();
    let confidence = (Decimal::ONE - dec!(0.2) * Decimal::from(failures)).max(Decimal::ZERO);

    QualityReview {
        passed: failures == 0,
        checks,
        confidence,
    }
}

fn outcome(name: &str, passed: bool, detail: String) -> QualityCheck {
    QualityCheck {
        name: name.to_string(),
        passed,
        detail,
    }
}

fn damage_items_reconcile(snapshot: &ClaimSnapshot) -> QualityCheck {
    let name = "damage_items_reconcile";
    if snapshot.damage_items.is_empty() {
        return outcome(name, true, "No itemized damage to reconcile".to_string());
    }
    let itemized = match Money::sum(
        snapshot.damage_items.iter().map(|i| &i.estimate),
        snapshot.currency,
    ) {
        Ok(total) => total,
        Err(err) => return outcome(name, false, format!("Cannot total damage items: {err}")),
    };
    let estimate = snapshot.estimated_damage.amount();
    let gap = (itemized.amount() - estimate).abs();
    let allowed = estimate.abs() * ITEMIZATION_TOLERANCE;
    outcome(
        name,
        gap <= allowed,
        format!(
            "Itemized {} vs estimate {} (gap {})",
            itemized, snapshot.estimated_damage, gap
        ),
    )
}

fn vehicles_match_participants(snapshot: &ClaimSnapshot) -> QualityCheck {
    let unmatched: Vec<String> = snapshot
        .vehicles
        .iter()
        .filter(|v| !snapshot.participants.iter().any(|p| p.role == v.owner_role))
        .map(|v| v.vehicle_id.to_string())
        .collect();
    outcome(
        "vehicles_match_participants",
        unmatched.is_empty(),
        if unmatched.is_empty() {
            "Every vehicle has a participant on its side".to_string()
        } else {
            format!("No participant for vehicle(s): {}", unmatched.join(", "))
        },
    )
}

fn loss_precedes_report(snapshot: &ClaimSnapshot) -> QualityCheck {
    let reported = snapshot.reported_at.date_naive();
    match snapshot.loss_date {
        Some(loss_date) => outcome(
            "loss_precedes_report",
            loss_date <= reported,
            format!("Loss {loss_date}, reported {reported}"),
        ),
        None => outcome("loss_precedes_report", false, "Loss date missing".to_string()),
    }
}

fn injury_assessed(snapshot: &ClaimSnapshot) -> QualityCheck {
    let passed = !snapshot.has_injury() || snapshot.injury_severity().is_some();
    outcome(
        "injury_assessed",
        passed,
        if passed {
            "Injury severity recorded or no injury".to_string()
        } else {
            "Injury reported without a severity".to_string()
        },
    )
}
