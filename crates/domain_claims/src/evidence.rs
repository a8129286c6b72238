//! Evidence inventory

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::snapshot::{ClaimSnapshot, DocumentKind, PartyRole};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSummary {
    pub documents_received: BTreeMap<DocumentKind, usize>,
    pub required: Vec<DocumentKind>,
    pub missing: Vec<DocumentKind>,
    /// Share of required documents on file, 0 to 1
    pub completeness: Decimal,
    pub witness_count: usize,
    pub confidence: Decimal,
}

impl EvidenceSummary {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Documents a claim of this shape should have on file
pub fn required_documents(snapshot: &ClaimSnapshot) -> Vec<DocumentKind> {
    let mut required = vec![DocumentKind::Photo, DocumentKind::RepairEstimate];
    if snapshot.police_report.is_some() || snapshot.has_injury() || snapshot.vehicles.len() > 1 {
        required.push(DocumentKind::PoliceReport);
    }
    if snapshot
        .participants
        .iter()
        .any(|p| p.role == PartyRole::OtherParty)
    {
        required.push(DocumentKind::Statement);
    }
    if snapshot.has_injury() {
        required.push(DocumentKind::MedicalRecord);
    }
    required
}

pub fn summarize_evidence(snapshot: &ClaimSnapshot) -> EvidenceSummary {
    let mut documents_received = BTreeMap::new();
    for document in &snapshot.documents {
        *documents_received.entry(document.kind).or_insert(0) += 1;
    }

    let required = required_documents(snapshot);
    let missing: Vec<DocumentKind> = required
        .iter()
        .copied()
        .filter(|kind| !documents_received.contains_key(kind))
        .collect();

    let completeness = if required.is_empty() {
        Decimal::ONE
    } else {
        (Decimal::from(required.len() - missing.len()) / Decimal::from(required.len())).round_dp(4)
    };

    EvidenceSummary {
        documents_received,
        required,
        missing,
        completeness,
        witness_count: snapshot.witnesses.len(),
        confidence: completeness,
    }
}
