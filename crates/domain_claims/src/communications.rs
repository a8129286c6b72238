//! Communications plan
//!
//! Lists the correspondence a claim still owes, derived from the compliance
//! report. Letter content is out of scope; only obligations and due dates
//! are produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compliance::{ComplianceReport, RequirementCategory, RequirementStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredCommunication {
    pub category: RequirementCategory,
    pub due_at: DateTime<Utc>,
    pub overdue: bool,
    pub statute: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationPlan {
    /// Outstanding correspondence, earliest due first
    pub outstanding: Vec<RequiredCommunication>,
}

impl CommunicationPlan {
    pub fn next_due(&self) -> Option<&RequiredCommunication> {
        self.outstanding.first()
    }

    pub fn overdue_count(&self) -> usize {
        self.outstanding.iter().filter(|c| c.overdue).count()
    }
}

fn is_correspondence(category: RequirementCategory) -> bool {
    !matches!(category, RequirementCategory::Investigation)
}

pub fn plan_communications(report: &ComplianceReport) -> CommunicationPlan {
    let mut outstanding: Vec<RequiredCommunication> = report
        .requirements
        .iter()
        .filter(|r| is_correspondence(r.category) && r.completed_at.is_none())
        .filter(|r| matches!(r.status, RequirementStatus::Pending | RequirementStatus::Overdue))
        .map(|r| RequiredCommunication {
            category: r.category,
            due_at: r.deadline,
            overdue: r.status == RequirementStatus::Overdue,
            statute: r.statute.clone(),
        })
        .collect();
    outstanding.sort_by_key(|c| c.due_at);
    CommunicationPlan { outstanding }
}
