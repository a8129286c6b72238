//! Pipeline phases

use std::fmt;

use serde::{Deserialize, Serialize};

/// The seven phases of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intake,
    Investigation,
    Evaluation,
    Communications,
    QualityAssurance,
    FinalValidation,
    Decision,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::Intake,
        Phase::Investigation,
        Phase::Evaluation,
        Phase::Communications,
        Phase::QualityAssurance,
        Phase::FinalValidation,
        Phase::Decision,
    ];

    /// Zero-based position in the run
    pub fn index(self) -> usize {
        self as usize
    }

    /// 1-based phase number as shown to adjusters
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn next(self) -> Option<Phase> {
        Phase::ALL.get(self.index() + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Intake => "intake",
            Phase::Investigation => "investigation",
            Phase::Evaluation => "evaluation",
            Phase::Communications => "communications",
            Phase::QualityAssurance => "quality_assurance",
            Phase::FinalValidation => "final_validation",
            Phase::Decision => "decision",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_are_ordered() {
        for pair in Phase::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert_eq!(Phase::Decision.next(), None);
    }

    #[test]
    fn test_phase_numbers() {
        assert_eq!(Phase::Intake.number(), 1);
        assert_eq!(Phase::Decision.number(), 7);
        assert_eq!(Phase::QualityAssurance.index(), 4);
    }
}
