// Display helpers: flatten ranked plays and rejected rows into printable rows.

use crate::engine::normalize::RejectedRow;
use crate::engine::types::{DefenseRank, ProjectedPlay, StatCategory};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Ranks at or below this are soft matchups (defense gives up the most).
const SOFT_MAX_RANK: u8 = 5;
/// Ranks at or above this are tough matchups.
const TOUGH_MIN_RANK: u8 = 26;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayRow {
    pub rank: usize,
    pub stat: StatCategory,
    pub player: String,
    pub matchup: String,
    pub position: String,
    pub games: u32,
    pub minutes: String,
    pub recent: String,
    pub dvp: String,
    pub projection: String,
    pub defense_rank: String,
    pub tier: &'static str,
    pub score: String,
}

pub fn matchup_tier(rank: Option<DefenseRank>) -> &'static str {
    match rank.map(|r| r.ordinal()) {
        Some(r) if r <= SOFT_MAX_RANK => "SOFT",
        Some(r) if r >= TOUGH_MIN_RANK => "TOUGH",
        _ => "NEUTRAL",
    }
}

pub fn build_play_rows(plays: &[ProjectedPlay]) -> Vec<PlayRow> {
    plays
        .iter()
        .map(|play| PlayRow {
            rank: play.rank,
            stat: play.stat,
            player: play.display_name.clone(),
            matchup: format!("{} vs {}", play.team, play.opponent),
            position: play.position.to_string(),
            games: play.games_played,
            minutes: format!("{:.1}", play.minutes_per_game),
            recent: format!("{:.1}", play.recent_component),
            dvp: format!("{:.1}", play.dvp_component),
            projection: format!("{:.1}", play.blended_projection),
            defense_rank: play
                .defense_rank
                .map(|r| r.ordinal().to_string())
                .unwrap_or_else(|| "-".to_string()),
            tier: matchup_tier(play.defense_rank),
            score: format!("{:+.2}", play.score),
        })
        .collect()
}

/// Fixed-width table, one block per category in category order.
pub fn format_play_table(rows: &[PlayRow]) -> String {
    let mut by_stat: BTreeMap<StatCategory, Vec<&PlayRow>> = BTreeMap::new();
    for row in rows {
        by_stat.entry(row.stat).or_default().push(row);
    }

    let mut out = String::new();
    for (stat, rows) in by_stat {
        let _ = writeln!(out, "== {} ==", stat);
        let _ = writeln!(
            out,
            "{:>3}  {:<24} {:<11} {:<3} {:>2} {:>5} {:>6} {:>6} {:>6} {:>4} {:<7} {:>7}",
            "#", "PLAYER", "MATCHUP", "POS", "G", "MIN", "RECENT", "DVP", "PROJ", "DEF", "TIER", "SCORE"
        );
        for r in rows {
            let _ = writeln!(
                out,
                "{:>3}  {:<24} {:<11} {:<3} {:>2} {:>5} {:>6} {:>6} {:>6} {:>4} {:<7} {:>7}",
                r.rank,
                r.player,
                r.matchup,
                r.position,
                r.games,
                r.minutes,
                r.recent,
                r.dvp,
                r.projection,
                r.defense_rank,
                r.tier,
                r.score
            );
        }
        out.push('\n');
    }
    out
}

/// Rejections grouped by reason label, most frequent first, ties by label.
pub fn rejection_summary(rejected: &[RejectedRow]) -> Vec<(&'static str, usize)> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for row in rejected {
        *counts.entry(row.reason.kind()).or_default() += 1;
    }
    let mut summary: Vec<_> = counts.into_iter().collect();
    summary.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    summary
}

/// e.g. "3 rows skipped (2 non-numeric value, 1 duplicate key)". `None` when
/// nothing was skipped.
pub fn skipped_headline(rejected: &[RejectedRow]) -> Option<String> {
    if rejected.is_empty() {
        return None;
    }
    let reasons: Vec<String> = rejection_summary(rejected)
        .into_iter()
        .map(|(kind, n)| format!("{} {}", n, kind))
        .collect();
    let noun = if rejected.len() == 1 { "row" } else { "rows" };
    Some(format!(
        "{} {} skipped ({})",
        rejected.len(),
        noun,
        reasons.join(", ")
    ))
}
