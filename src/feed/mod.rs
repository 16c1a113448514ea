pub mod snapshot_dir;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use types::RawSnapshot;

/// Anything that can hand over one date's raw DVP, recent-stat, lineup,
/// schedule, and odds rows: a scraper, a manual paste, or files on disk.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load(&mut self, date: NaiveDate) -> Result<RawSnapshot>;
    fn name(&self) -> &str;
}
