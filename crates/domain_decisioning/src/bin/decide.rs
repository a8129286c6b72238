//! Claims Decisioning - Command-line runner
//!
//! Reads claim snapshots from JSON files, runs each through the pipeline and
//! prints the decisions as JSON lines.
//!
//! # Usage
//!
//! ```bash
//! claims-decide snapshots/claim-101.json snapshots/claim-102.json
//!
//! # Evaluate deadlines at a fixed instant and log as JSON
//! CLAIMS__TELEMETRY__FORMAT=json claims-decide --as-of 2024-03-15T09:00:00Z claim.json
//! ```
//!
//! Thresholds are read from `CLAIMS__`-prefixed environment variables; see
//! `PipelineConfig`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use core_kernel::ClaimId;
use domain_claims::{ClaimSnapshot, StaticJurisdictionTable};
use domain_decisioning::{
    init_tracing, InMemoryAuditLog, InMemoryClaimRecords, Orchestrator, PipelineConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::load()?;
    init_tracing(&config.telemetry)?;

    let (as_of, paths) = parse_args(std::env::args().skip(1))?;
    if paths.is_empty() {
        return Err("usage: claims-decide [--as-of RFC3339] <snapshot.json>...".into());
    }

    let snapshots = paths
        .iter()
        .map(|path| read_snapshot(path))
        .collect::<Result<Vec<_>, _>>()?;
    let claim_ids: Vec<ClaimId> = snapshots.iter().map(|s| s.claim_id).collect();
    tracing::info!(count = claim_ids.len(), %as_of, "Loaded claim snapshots");

    let orchestrator = Orchestrator::new(
        Arc::new(InMemoryClaimRecords::with_snapshots(snapshots)),
        Arc::new(StaticJurisdictionTable),
        Arc::new(InMemoryAuditLog::new()),
        config,
    );

    for outcome in orchestrator.run_batch(&claim_ids, as_of).await {
        let line = json!({
            "claim_id": outcome.claim_id().to_string(),
            "decision": outcome.decision,
            "triggers": outcome.triggers(),
            "stages": outcome.ledger(),
        });
        println!("{}", line);
    }
    Ok(())
}

fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<(DateTime<Utc>, Vec<PathBuf>), Box<dyn std::error::Error>> {
    let mut as_of = Utc::now();
    let mut paths = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--as-of" {
            let value = args.next().ok_or("--as-of needs a timestamp")?;
            as_of = DateTime::parse_from_rfc3339(&value)?.with_timezone(&Utc);
        } else {
            paths.push(PathBuf::from(arg));
        }
    }
    Ok((as_of, paths))
}

fn read_snapshot(path: &Path) -> Result<ClaimSnapshot, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let snapshot = serde_json::from_str(&contents)
        .map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
    Ok(snapshot)
}
