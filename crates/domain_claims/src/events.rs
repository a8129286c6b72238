//! Structured stage events
//!
//! Scorers do not log. Anything notable they observe is returned as a
//! [`StageEvent`]; the orchestrator forwards events to tracing and the audit
//! log.

use serde::{Deserialize, Serialize};

use crate::escalation::StageName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEvent {
    pub stage: StageName,
    pub level: EventLevel,
    /// Stable machine-readable code, e.g. `jurisdiction_default_applied`
    pub code: String,
    pub message: String,
}

impl StageEvent {
    pub fn info(stage: StageName, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage,
            level: EventLevel::Info,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn warning(stage: StageName, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage,
            level: EventLevel::Warning,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.level == EventLevel::Warning
    }
}
