//! Pipeline orchestrator
//!
//! Drives one claim through the seven phases and emits a [`ClaimDecision`].
//!
//! ```text
//! Intake ─► Investigation ─► Evaluation ─► Communications ─► QualityAssurance ─► FinalValidation ─► Decision
//!            liability ║        severity ║     compliance        fraud ║
//!            evidence  ║        valuation║     └► plan           quality║
//!                               └► reserve
//! ```
//!
//! Phases run strictly in order. Stages inside a phase that do not depend on
//! each other run as blocking tasks joined before the phase completes. Every
//! stage result is written to the ledger and the audit log; any stage error
//! ends the run early with `EscalateHuman`.
//!
//! # Example
//!
//! ```rust,ignore
//! let orchestrator = Orchestrator::new(
//!     Arc::new(InMemoryClaimRecords::with_snapshots(snapshots)),
//!     Arc::new(StaticJurisdictionTable),
//!     Arc::new(InMemoryAuditLog::new()),
//!     PipelineConfig::load()?,
//! );
//! let outcome = orchestrator.run(claim_id).await;
//! println!("{}: {}", outcome.decision.decision, outcome.decision.reason);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use core_kernel::{ClaimId, OperationMetadata, RunId};
use domain_claims::{
    assess_fraud, assess_liability, monitor_compliance, plan_communications, recommend_reserve,
    review_intake, review_quality, score_severity, summarize_evidence, validate_for_approval,
    value_claim, ClaimError, ClaimSnapshot, ComplianceInput, EscalationTrigger, FraudInput,
    JurisdictionLookup, JurisdictionRules, LiabilityInput, SeverityInput, StageName,
    TriggerSeverity, TriggerType, ValidationInput, ValuationInput,
};

use crate::audit::{snapshot_summary, AuditEntry};
use crate::config::PipelineConfig;
use crate::decision::{decide, ClaimDecision};
use crate::ledger::{ResultLedger, StageOutcome};
use crate::phase::Phase;
use crate::ports::{AuditSink, ClaimRecordPort, JurisdictionSource};
use crate::state::{OrchestratorState, PhaseOutput};
use crate::triggers;

const INITIATOR: &str = "claims-decisioning";

/// Lets a caller stop a run between phases
///
/// A phase already in progress always finishes.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Everything a caller gets back from a run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub decision: ClaimDecision,
    pub state: OrchestratorState,
}

impl PipelineOutcome {
    pub fn claim_id(&self) -> ClaimId {
        self.state.claim_id
    }

    pub fn ledger(&self) -> &ResultLedger {
        &self.state.ledger
    }

    pub fn triggers(&self) -> &[EscalationTrigger] {
        &self.state.triggers
    }
}

/// Read-only inputs shared by every stage of one run
struct RunContext {
    snapshot: Arc<ClaimSnapshot>,
    lookup: JurisdictionLookup,
    rules: Arc<JurisdictionRules>,
    as_of: DateTime<Utc>,
    summary: Value,
}

/// Sequences the scoring stages for claims
///
/// Cloning is cheap; clones share the same ports and configuration.
#[derive(Clone)]
pub struct Orchestrator {
    records: Arc<dyn ClaimRecordPort>,
    jurisdictions: Arc<dyn JurisdictionSource>,
    audit: Arc<dyn AuditSink>,
    config: Arc<PipelineConfig>,
}

impl Orchestrator {
    pub fn new(
        records: Arc<dyn ClaimRecordPort>,
        jurisdictions: Arc<dyn JurisdictionSource>,
        audit: Arc<dyn AuditSink>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            records,
            jurisdictions,
            audit,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decides a claim as of now
    pub async fn run(&self, claim_id: ClaimId) -> PipelineOutcome {
        self.run_as_of(claim_id, Utc::now(), &CancelHandle::new()).await
    }

    /// Decides a claim with deadlines evaluated at `as_of`
    ///
    /// A claim record that cannot be fetched still yields a decision:
    /// `EscalateHuman` with the port error as the reason.
    #[instrument(skip(self, claim_id, cancel), fields(claim_id = %claim_id))]
    pub async fn run_as_of(
        &self,
        claim_id: ClaimId,
        as_of: DateTime<Utc>,
        cancel: &CancelHandle,
    ) -> PipelineOutcome {
        let run_id = RunId::new_v7();
        match self
            .records
            .fetch_snapshot(claim_id, Some(metadata(run_id)))
            .await
        {
            Ok(snapshot) => self.execute(run_id, snapshot, as_of, cancel).await,
            Err(err) => {
                warn!(
                    error = %err,
                    transient = err.is_transient(),
                    "Claim record unavailable; escalating"
                );
                let state = OrchestratorState::new(run_id, claim_id, as_of)
                    .short_circuit(Phase::Intake, format!("claim record unavailable: {}", err));
                self.conclude(state, false).await
            }
        }
    }

    /// Decides a snapshot the caller already holds
    #[instrument(skip(self, snapshot, cancel), fields(claim_id = %snapshot.claim_id))]
    pub async fn run_snapshot(
        &self,
        snapshot: ClaimSnapshot,
        as_of: DateTime<Utc>,
        cancel: &CancelHandle,
    ) -> PipelineOutcome {
        self.execute(RunId::new_v7(), snapshot, as_of, cancel).await
    }

    /// Decides many claims concurrently
    ///
    /// Runs share no mutable state. At most `batch.max_concurrent_runs` claims
    /// are in flight at once. Outcomes come back in input order.
    pub async fn run_batch(&self, claim_ids: &[ClaimId], as_of: DateTime<Utc>) -> Vec<PipelineOutcome> {
        let max_concurrent = self.config.batch.max_concurrent_runs.max(1);
        info!(count = claim_ids.len(), max_concurrent, "Starting batch run");
        let permits = Arc::new(Semaphore::new(max_concurrent));
        let handles: Vec<_> = claim_ids
            .iter()
            .map(|&claim_id| {
                let orchestrator = self.clone();
                let permits = Arc::clone(&permits);
                let handle = tokio::spawn(async move {
                    // never closed, so acquiring only waits
                    let _permit = permits.acquire_owned().await;
                    orchestrator
                        .run_as_of(claim_id, as_of, &CancelHandle::new())
                        .await
                });
                (claim_id, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (claim_id, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(%claim_id, error = %err, "Batch task failed; escalating");
                    let state = OrchestratorState::new(RunId::new_v7(), claim_id, as_of)
                        .short_circuit(Phase::Intake, format!("run task failed: {}", err));
                    self.conclude(state, false).await
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn execute(
        &self,
        run_id: RunId,
        snapshot: ClaimSnapshot,
        as_of: DateTime<Utc>,
        cancel: &CancelHandle,
    ) -> PipelineOutcome {
        let lookup = self.jurisdictions.jurisdiction(&snapshot.jurisdiction_code);
        if let JurisdictionLookup::DefaultApplied { requested, .. } = &lookup {
            warn!(requested = %requested, "Unknown jurisdiction; applying default rules");
        }
        let denial_contemplated = snapshot.denial_contemplated;
        let ctx = RunContext {
            rules: Arc::new(lookup.rules().clone()),
            summary: snapshot_summary(&snapshot),
            snapshot: Arc::new(snapshot),
            lookup,
            as_of,
        };
        let mut state = OrchestratorState::new(run_id, ctx.snapshot.claim_id, as_of);
        info!(%run_id, jurisdiction = %ctx.rules.code, "Starting decisioning run");

        for phase in Phase::ALL.into_iter().take_while(|p| *p != Phase::Decision) {
            if cancel.is_cancelled() {
                info!(%phase, "Run cancelled");
                state = state.cancel(phase);
                break;
            }

            let output = match self.run_phase(phase, &ctx, &state).await {
                Ok(output) => output,
                Err(err) => {
                    warn!(%phase, error = %err, "Phase failed; escalating");
                    state = state.short_circuit(phase, err.to_string());
                    break;
                }
            };
            let output = self.record(&state, phase, output, &ctx).await;

            match state.advance(phase, output) {
                Ok(next) => state = next,
                Err(err) => {
                    warn!(%phase, error = %err, "Phase result rejected; escalating");
                    state = state.short_circuit(phase, err.to_string());
                    break;
                }
            }
            debug!(%phase, triggers = state.triggers.len(), "Phase complete");
        }

        self.conclude(state, denial_contemplated).await
    }

    async fn run_phase(
        &self,
        phase: Phase,
        ctx: &RunContext,
        state: &OrchestratorState,
    ) -> Result<PhaseOutput, ClaimError> {
        match phase {
            Phase::Intake => self.intake(ctx).await,
            Phase::Investigation => self.investigation(ctx).await,
            Phase::Evaluation => self.evaluation(ctx).await,
            Phase::Communications => self.communications(ctx).await,
            Phase::QualityAssurance => self.quality_assurance(ctx).await,
            Phase::FinalValidation => self.final_validation(ctx, state).await,
            Phase::Decision => Ok(PhaseOutput::new()),
        }
    }

    async fn intake(&self, ctx: &RunContext) -> Result<PhaseOutput, ClaimError> {
        let snapshot = Arc::clone(&ctx.snapshot);
        let lookup = ctx.lookup.clone();
        let report =
            run_stage(StageName::Intake, move || Ok(review_intake(&snapshot, &lookup))).await?;

        Ok(PhaseOutput::new()
            .raise_all(triggers::intake(&report))
            .record(StageOutcome::Intake(report)))
    }

    async fn investigation(&self, ctx: &RunContext) -> Result<PhaseOutput, ClaimError> {
        let (snapshot, rules, config) = (
            Arc::clone(&ctx.snapshot),
            Arc::clone(&ctx.rules),
            Arc::clone(&self.config),
        );
        let evidence_snapshot = Arc::clone(&ctx.snapshot);

        let (liability, evidence) = tokio::try_join!(
            run_stage(StageName::Liability, move || {
                assess_liability(&LiabilityInput::from_snapshot(&snapshot), &rules, &config.liability)
            }),
            run_stage(StageName::Evidence, move || {
                Ok(summarize_evidence(&evidence_snapshot))
            }),
        )?;

        Ok(PhaseOutput::new()
            .raise_all(triggers::liability(&liability))
            .raise_all(triggers::evidence(&evidence))
            .record(StageOutcome::Liability(liability))
            .record(StageOutcome::Evidence(evidence)))
    }

    async fn evaluation(&self, ctx: &RunContext) -> Result<PhaseOutput, ClaimError> {
        let (snapshot, config) = (Arc::clone(&ctx.snapshot), Arc::clone(&self.config));
        let (valuation_snapshot, rules) = (Arc::clone(&ctx.snapshot), Arc::clone(&ctx.rules));

        let (severity, valuation) = tokio::try_join!(
            run_stage(StageName::Severity, move || {
                Ok(score_severity(&SeverityInput::from_snapshot(&snapshot), &config.severity))
            }),
            run_stage(StageName::Valuation, move || {
                value_claim(&ValuationInput::from_snapshot(&valuation_snapshot), &rules)
            }),
        )?;

        let reserve = {
            let (valuation, severity) = (valuation.clone(), severity.clone());
            run_stage(StageName::Reserve, move || recommend_reserve(&valuation, &severity)).await?
        };

        Ok(PhaseOutput::new()
            .raise_all(triggers::severity(&severity))
            .record(StageOutcome::Severity(severity))
            .record(StageOutcome::Valuation(valuation))
            .record(StageOutcome::Reserve(reserve)))
    }

    async fn communications(&self, ctx: &RunContext) -> Result<PhaseOutput, ClaimError> {
        let (snapshot, rules, as_of) = (Arc::clone(&ctx.snapshot), Arc::clone(&ctx.rules), ctx.as_of);
        let report = run_stage(StageName::Compliance, move || {
            Ok(monitor_compliance(
                &ComplianceInput::from_snapshot(&snapshot),
                &rules,
                as_of,
            ))
        })
        .await?;

        let plan = {
            let report = report.clone();
            run_stage(StageName::Communications, move || Ok(plan_communications(&report))).await?
        };
        if plan.overdue_count() > 0 {
            debug!(overdue = plan.overdue_count(), "Outstanding correspondence overdue");
        }

        Ok(PhaseOutput::new()
            .raise_all(triggers::compliance(&report))
            .record(StageOutcome::Compliance(report))
            .record(StageOutcome::Communications(plan)))
    }

    async fn quality_assurance(&self, ctx: &RunContext) -> Result<PhaseOutput, ClaimError> {
        let (snapshot, config) = (Arc::clone(&ctx.snapshot), Arc::clone(&self.config));
        let review_snapshot = Arc::clone(&ctx.snapshot);

        let (fraud, review) = tokio::try_join!(
            run_stage(StageName::Fraud, move || {
                Ok(assess_fraud(&FraudInput::from_snapshot(&snapshot), &config.fraud))
            }),
            run_stage(StageName::QualityReview, move || Ok(review_quality(&review_snapshot))),
        )?;

        Ok(PhaseOutput::new()
            .raise_all(triggers::fraud(&fraud, &self.config.fraud))
            .raise_all(triggers::quality(&review))
            .record(StageOutcome::Fraud(fraud))
            .record(StageOutcome::QualityReview(review)))
    }

    async fn final_validation(
        &self,
        ctx: &RunContext,
        state: &OrchestratorState,
    ) -> Result<PhaseOutput, ClaimError> {
        let (snapshot, config) = (Arc::clone(&ctx.snapshot), Arc::clone(&self.config));
        let fraud_score = state.fraud_score();
        let compliance_status = state.ledger.compliance().map(|c| c.status);
        let upstream_fraud_trigger = state.has_fraud_trigger();

        let validation = run_stage(StageName::FinalValidation, move || {
            let input = ValidationInput {
                snapshot: &snapshot,
                fraud_score,
                compliance_status,
                upstream_fraud_trigger,
            };
            Ok(validate_for_approval(&input, &config.validation))
        })
        .await?;

        Ok(PhaseOutput::new()
            .raise_all(triggers::final_validation(&validation))
            .record(StageOutcome::FinalValidation(validation)))
    }

    /// Forwards stage events to tracing and appends one audit entry per stage
    ///
    /// A failed append does not stop the run; it adds an audit trigger.
    async fn record(
        &self,
        state: &OrchestratorState,
        phase: Phase,
        output: PhaseOutput,
        ctx: &RunContext,
    ) -> PhaseOutput {
        let mut failures = Vec::new();
        for outcome in &output.outcomes {
            let stage = outcome.stage();
            for event in outcome.events() {
                if event.is_warning() {
                    warn!(%stage, code = %event.code, "{}", event.message);
                } else {
                    debug!(%stage, code = %event.code, "{}", event.message);
                }
            }

            let entry = AuditEntry::stage(
                state.run_id,
                state.claim_id,
                phase,
                outcome,
                ctx.summary.clone(),
            );
            let op = metadata(state.run_id).with_context("stage", stage.as_str());
            if let Err(err) = self.audit.append(entry, Some(op)).await {
                warn!(%stage, error = %err, "Audit entry not recorded");
                failures.push(
                    EscalationTrigger::new(
                        TriggerType::Audit,
                        TriggerSeverity::Medium,
                        format!("Audit entry for {} not recorded: {}", stage, err),
                    )
                    .raised_by(stage),
                );
            }
        }
        output.raise_all(failures)
    }

    async fn conclude(&self, state: OrchestratorState, denial_contemplated: bool) -> PipelineOutcome {
        let decision = decide(&state, &self.config.decision, denial_contemplated);
        let state = match state.conclude() {
            Ok(concluded) => concluded,
            Err(err) => {
                warn!(error = %err, "Decision phase not recorded");
                state
            }
        };

        let entry = AuditEntry::decision(state.run_id, state.claim_id, &decision, &state.triggers);
        if let Err(err) = self.audit.append(entry, Some(metadata(state.run_id))).await {
            warn!(error = %err, "Decision audit entry not recorded");
        }

        info!(
            claim_id = %state.claim_id,
            decision = %decision.decision,
            confidence = %decision.confidence,
            triggers = state.triggers.len(),
            "Claim decided"
        );
        PipelineOutcome { decision, state }
    }
}

fn metadata(run_id: RunId) -> OperationMetadata {
    OperationMetadata::with_correlation_id(run_id.to_string()).initiated_by(INITIATOR)
}

/// Runs one synchronous stage on the blocking pool
///
/// A panic inside the stage surfaces as a stage error.
async fn run_stage<T, F>(stage: StageName, work: F) -> Result<T, ClaimError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ClaimError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ClaimError::stage(stage.as_str(), format!("task failed: {}", err)))?
        .map_err(|err| err.into_stage_error(stage.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_stage_maps_panic_to_stage_error() {
        let result: Result<u8, ClaimError> =
            run_stage(StageName::Valuation, || panic!("valuation blew up")).await;

        match result {
            Err(ClaimError::Stage { stage, .. }) => assert_eq!(stage, "valuation"),
            other => panic!("expected stage error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_stage_labels_errors_with_stage() {
        let result: Result<u8, ClaimError> = run_stage(StageName::Reserve, || {
            Err(ClaimError::validation("deductible", "currency mismatch"))
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("reserve"));
        assert!(err.to_string().contains("currency mismatch"));
    }

    #[test]
    fn test_cancel_handle_is_shared_between_clones() {
        let handle = CancelHandle::new();
        let clone = handle.clone();
        clone.cancel();
        assert!(handle.is_cancelled());
    }
}
