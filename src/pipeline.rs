use crate::config::Config;
use crate::engine::normalize::{normalize_snapshot, RejectedRow};
use crate::engine::types::{OddsQuote, ProjectedPlay};
use crate::engine::Engine;
use crate::error::ConfigError;
use crate::feed::types::RawSnapshot;
use crate::feed::SnapshotSource;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;

/// Everything one date's run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub date: NaiveDate,
    pub plays: Vec<ProjectedPlay>,
    /// Normalized quotes, kept for edge lookups after ranking.
    pub odds: Vec<OddsQuote>,
    pub rejected: Vec<RejectedRow>,
}

impl RunReport {
    pub fn skipped(&self) -> usize {
        self.rejected.len()
    }
}

/// Normalize a raw snapshot and rank its plays.
///
/// Bad rows never abort the run; they come back in `rejected`. Only an
/// invalid configuration is an error.
pub fn run(raw: &RawSnapshot, config: &Config) -> Result<RunReport, ConfigError> {
    let engine = Engine::new(config)?;
    let snapshot = normalize_snapshot(raw, &config.data);
    let plays = engine.compute_projections(&snapshot.dvp, &snapshot.recent, &snapshot.lineups);

    tracing::info!(
        date = %raw.date,
        plays = plays.len(),
        rejected = snapshot.rejected.len(),
        "run complete"
    );

    Ok(RunReport {
        date: raw.date,
        plays,
        odds: snapshot.odds,
        rejected: snapshot.rejected,
    })
}

/// Load `date` from `source`, then [`run`] it.
pub async fn run_from_source(
    source: &mut dyn SnapshotSource,
    date: NaiveDate,
    config: &Config,
) -> anyhow::Result<RunReport> {
    let raw = source
        .load(date)
        .await
        .with_context(|| format!("Failed to load {} snapshot for {}", source.name(), date))?;
    Ok(run(&raw, config)?)
}
