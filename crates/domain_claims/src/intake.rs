//! Intake review
//!
//! Structural rules come from the `validator` derives on the snapshot;
//! cross-field rules (date ordering, currency consistency) are checked here.
//! Problems never abort the run. They are reported as issues and become a
//! data-quality escalation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use core_kernel::Money;

use crate::error::ClaimError;
use crate::escalation::StageName;
use crate::events::StageEvent;
use crate::jurisdiction::JurisdictionLookup;
use crate::snapshot::ClaimSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeIssue {
    /// Dotted path of the offending field, e.g. `vehicles[0].model_year`
    pub field: String,
    pub message: String,
}

impl IntakeIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<IntakeIssue> for ClaimError {
    fn from(issue: IntakeIssue) -> Self {
        ClaimError::validation(issue.field, issue.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeReport {
    pub valid: bool,
    pub issues: Vec<IntakeIssue>,
    pub requested_jurisdiction: String,
    pub applied_jurisdiction: String,
    pub default_jurisdiction_applied: bool,
    pub confidence: Decimal,
    pub events: Vec<StageEvent>,
}

/// Reviews a snapshot before any scoring happens
pub fn review_intake(snapshot: &ClaimSnapshot, lookup: &JurisdictionLookup) -> IntakeReport {
    let mut issues = Vec::new();
    if let Err(errors) = snapshot.validate() {
        flatten_errors("", &errors, &mut issues);
    }
    issues.sort_by(|a, b| a.field.cmp(&b.field));
    semantic_issues(snapshot, &mut issues);

    let mut events: Vec<StageEvent> = issues
        .iter()
        .map(|issue| {
            StageEvent::warning(
                StageName::Intake,
                "invalid_field",
                format!("{}: {}", issue.field, issue.message),
            )
        })
        .collect();

    let mut confidence = dec!(1.0) - dec!(0.1) * Decimal::from(issues.len());
    if let JurisdictionLookup::DefaultApplied { requested, rules } = lookup {
        confidence -= dec!(0.1);
        events.push(StageEvent::warning(
            StageName::Intake,
            "jurisdiction_default_applied",
            format!(
                "{}; applying {} rules",
                ClaimError::UnknownJurisdiction(requested.clone()),
                rules.code
            ),
        ));
    }

    IntakeReport {
        valid: issues.is_empty(),
        issues,
        requested_jurisdiction: snapshot.jurisdiction_code.clone(),
        applied_jurisdiction: lookup.rules().code.clone(),
        default_jurisdiction_applied: lookup.is_default(),
        confidence: confidence.max(Decimal::ZERO),
        events,
    }
}

fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<IntakeIssue>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    out.push(IntakeIssue::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn semantic_issues(snapshot: &ClaimSnapshot, out: &mut Vec<IntakeIssue>) {
    if let Some(loss_date) = snapshot.loss_date {
        let reported = snapshot.reported_at.date_naive();
        if loss_date > reported {
            out.push(IntakeIssue::new(
                "loss_date",
                format!("loss date {loss_date} is after the report date {reported}"),
            ));
        }
    }

    if !snapshot.vehicles.is_empty() && snapshot.insured_vehicle().is_none() {
        out.push(IntakeIssue::new("vehicles", "no vehicle belongs to the insured"));
    }

    if let Some(injury) = snapshot.injury.as_ref() {
        if let (Some(severity), 0) = (injury.severity, injury.injured_count) {
            out.push(IntakeIssue::new(
                "injury.injured_count",
                format!("injury severity {severity:?} recorded with no injured persons"),
            ));
        }
    }

    if snapshot.estimated_damage.is_negative() {
        out.push(IntakeIssue::new("estimated_damage", "damage estimate is negative"));
    }

    let mut amounts: Vec<(String, &Money)> = vec![
        ("estimated_damage".to_string(), &snapshot.estimated_damage),
        ("policy.deductible".to_string(), &snapshot.policy.deductible),
    ];
    for (index, vehicle) in snapshot.vehicles.iter().enumerate() {
        amounts.push((
            format!("vehicles[{index}].actual_cash_value"),
            &vehicle.actual_cash_value,
        ));
    }
    for (index, item) in snapshot.damage_items.iter().enumerate() {
        amounts.push((format!("damage_items[{index}].estimate"), &item.estimate));
    }
    if let Some(settlement) = snapshot.settlement_amount.as_ref() {
        amounts.push(("settlement_amount".to_string(), settlement));
    }
    for (field, amount) in amounts {
        if amount.currency() != snapshot.currency {
            out.push(IntakeIssue::new(
                field,
                format!(
                    "currency {} differs from claim currency {}",
                    amount.currency(),
                    snapshot.currency
                ),
            ));
        }
    }
}
