//! Pipeline configuration
//!
//! Every threshold the stages and the decision phase use, loaded from
//! `CLAIMS__`-prefixed environment variables. Nested sections use `__`
//! as the separator:
//!
//! * `CLAIMS__SEVERITY__ESCALATION_SCORE` - overall score that forces escalation (default: 80)
//! * `CLAIMS__FRAUD__SIU_THRESHOLD` - fraud score referred to the SIU (default: 70)
//! * `CLAIMS__DECISION__AUTO_APPROVE_CEILING` - highest auto-approved value (default: 5000)
//! * `CLAIMS__SEVERITY__AUTO_APPROVAL_CEILING` - same ceiling for severity routing; must match
//! * `CLAIMS__DECISION__MIN_CONFIDENCE` - lowest auto-approved confidence (default: 0.75)
//! * `CLAIMS__BATCH__MAX_CONCURRENT_RUNS` - claims decided at once in a batch (default: 16)
//! * `CLAIMS__TELEMETRY__LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `CLAIMS__TELEMETRY__FORMAT` - plain or json (default: plain)
//!
//! Anything not set keeps its default.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_claims::{FraudPolicy, LiabilityPolicy, SeverityPolicy, ValidationPolicy};

use crate::decision::DecisionPolicy;
use crate::error::DecisioningError;
use crate::telemetry::TelemetryConfig;

const ENV_PREFIX: &str = "CLAIMS";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub severity: SeverityPolicy,
    pub liability: LiabilityPolicy,
    pub fraud: FraudPolicy,
    pub validation: ValidationPolicy,
    pub decision: DecisionPolicy,
    pub batch: BatchConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub max_concurrent_runs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_runs: 16,
        }
    }
}

impl PipelineConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(environment())
    }

    fn from_source(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Reads `.env` if present, loads from the environment and validates
    pub fn load() -> Result<Self, DecisioningError> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects threshold combinations that cannot be meant
    pub fn validate(&self) -> Result<(), DecisioningError> {
        let problem = if self.decision.min_confidence < Decimal::ZERO
            || self.decision.min_confidence > Decimal::ONE
        {
            Some("decision.min_confidence must be between 0 and 1".to_string())
        } else if self.decision.auto_approve_ceiling.is_sign_negative() {
            Some("decision.auto_approve_ceiling must not be negative".to_string())
        } else if self.severity.auto_approval_ceiling != self.decision.auto_approve_ceiling {
            Some(format!(
                "severity.auto_approval_ceiling {} differs from decision.auto_approve_ceiling {}",
                self.severity.auto_approval_ceiling, self.decision.auto_approve_ceiling
            ))
        } else if self.fraud.referral_threshold > self.fraud.siu_threshold {
            Some(format!(
                "fraud.referral_threshold {} exceeds fraud.siu_threshold {}",
                self.fraud.referral_threshold, self.fraud.siu_threshold
            ))
        } else if self.decision.fraud_pass_threshold > self.decision.siu_threshold {
            Some(format!(
                "decision.fraud_pass_threshold {} exceeds decision.siu_threshold {}",
                self.decision.fraud_pass_threshold, self.decision.siu_threshold
            ))
        } else if self.severity.auto_approval_max_score >= self.severity.escalation_score {
            Some("severity.auto_approval_max_score must be below severity.escalation_score".to_string())
        } else if self.batch.max_concurrent_runs == 0 {
            Some("batch.max_concurrent_runs must be at least 1".to_string())
        } else if self.liability.confidence_cap > Decimal::ONE {
            Some("liability.confidence_cap must not exceed 1".to_string())
        } else {
            None
        };
        match problem {
            Some(message) => Err(DecisioningError::Configuration(message)),
            None => Ok(()),
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}
