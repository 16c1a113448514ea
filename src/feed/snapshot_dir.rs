//! Snapshot source backed by dated folders of CSV exports.
//!
//! Layout: `<root>/<YYYY-MM-DD>/{dvp,recent|last_n,lineups,schedule,odds}.csv`.
//! `schedule.csv` and `odds.csv` are optional. `recent.csv` holds one row per
//! player and category; `last_n.csv` is the wide per-player export and is
//! expanded here.

use super::types::*;
use super::SnapshotSource;
use crate::engine::types::StatCategory;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvSnapshotDir {
    root: PathBuf,
}

impl CsvSnapshotDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn date_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date.format(DATE_FORMAT).to_string())
    }
}

#[async_trait]
impl SnapshotSource for CsvSnapshotDir {
    async fn load(&mut self, date: NaiveDate) -> Result<RawSnapshot> {
        let dir = self.date_dir(date);

        let dvp = parse_rows(&read_required(&dir, "dvp.csv").await?);
        let recent = match read_optional(&dir, "recent.csv").await? {
            Some(text) => parse_rows(&text),
            None => match read_optional(&dir, "last_n.csv").await? {
                Some(text) => expand_player_lines(&parse_rows(&text)),
                None => bail!(
                    "no recent stats in {} (expected recent.csv or last_n.csv)",
                    dir.display()
                ),
            },
        };
        let lineups = parse_rows(&read_required(&dir, "lineups.csv").await?);
        let schedule = read_optional(&dir, "schedule.csv")
            .await?
            .map(|text| parse_rows(&text))
            .unwrap_or_default();
        let odds = read_optional(&dir, "odds.csv")
            .await?
            .map(|text| parse_rows(&text))
            .unwrap_or_default();

        tracing::info!(
            source = self.name(),
            %date,
            dvp = dvp.len(),
            recent = recent.len(),
            lineups = lineups.len(),
            "loaded snapshot"
        );

        Ok(RawSnapshot {
            date,
            dvp,
            recent,
            lineups,
            schedule,
            odds,
        })
    }

    fn name(&self) -> &str {
        "csv-dir"
    }
}

async fn read_required(dir: &Path, file: &str) -> Result<String> {
    let path = dir.join(file);
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))
}

async fn read_optional(dir: &Path, file: &str) -> Result<Option<String>> {
    let path = dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read snapshot file: {}", path.display())),
    }
}

/// Parse CSV text with a header row.
///
/// A record that can't be decoded becomes an all-empty row rather than being
/// dropped, so the normalizer reports it at its original index.
/// Public for unit testing with fixtures.
pub fn parse_rows<T: DeserializeOwned + Default>(text: &str) -> Vec<T> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(index, record)| match record {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(index, error = %e, "undecodable CSV record");
                T::default()
            }
        })
        .collect()
}

/// Expand wide per-player lines into one long row per category, deriving the
/// PR/PA/PRA combos from their components.
pub fn expand_player_lines(lines: &[RawPlayerLine]) -> Vec<RawStatRow> {
    let mut rows = Vec::new();
    for line in lines {
        let columns = [
            (StatCategory::Points, &line.pts),
            (StatCategory::Rebounds, &line.reb),
            (StatCategory::Assists, &line.ast),
            (StatCategory::Threes, &line.fg3),
            (StatCategory::Steals, &line.stl),
            (StatCategory::Blocks, &line.blk),
            (StatCategory::Turnovers, &line.tov),
        ];

        for (stat, value) in columns {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                continue;
            }
            rows.push(stat_row(line, stat, value.clone()));
        }

        for combo in [
            StatCategory::PointsRebounds,
            StatCategory::PointsAssists,
            StatCategory::PointsReboundsAssists,
        ] {
            let total: Option<f64> = combo
                .components()
                .iter()
                .map(|component| {
                    let value = match component {
                        StatCategory::Points => &line.pts,
                        StatCategory::Rebounds => &line.reb,
                        _ => &line.ast,
                    };
                    value.as_deref().and_then(|v| v.trim().parse::<f64>().ok())
                })
                .sum();
            if let Some(total) = total {
                rows.push(stat_row(line, combo, Some(total.to_string())));
            }
        }
    }
    rows
}

fn stat_row(line: &RawPlayerLine, stat: StatCategory, average: Option<String>) -> RawStatRow {
    RawStatRow {
        player: line.player.clone(),
        stat: Some(stat.code().to_string()),
        window_days: None,
        games: line.games.clone(),
        average,
        mpg: line.mpg.clone(),
    }
}

/// Newest date-named folder under `root`, if any.
pub async fn latest_date(root: &Path) -> Result<Option<NaiveDate>> {
    let mut entries = tokio::fs::read_dir(root)
        .await
        .with_context(|| format!("Failed to list snapshot root: {}", root.display()))?;

    let mut latest: Option<NaiveDate> = None;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(date) = name
            .to_str()
            .and_then(|n| NaiveDate::parse_from_str(n, DATE_FORMAT).ok())
        else {
            continue;
        };
        if latest.map_or(true, |l| date > l) {
            latest = Some(date);
        }
    }
    Ok(latest)
}
