//! Row validation: raw scraper rows in, canonical entities plus rejections out.
//!
//! A bad row never aborts the batch. Each normalizer returns the rows it could
//! use and a `RejectedRow` for every one it could not, tagged with the source
//! and the row's position in the input.

use super::odds::is_valid_american;
use super::types::{
    DefenseRank, DvpRating, LineupEntry, OddsQuote, Position, RecentStatRecord, StatCategory,
};
use crate::config::DataConfig;
use crate::error::RowError;
use crate::feed::types::{
    RawDvpRow, RawLineupRow, RawOddsRow, RawScheduleRow, RawSnapshot, RawStatRow,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Per-game averages above this are export errors, not stat lines.
const MAX_STAT_AVERAGE: f64 = 500.0;
/// Regulation plus several overtimes.
const MAX_MINUTES_PER_GAME: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowSource {
    Dvp,
    Recent,
    Lineup,
    Schedule,
    Odds,
}

impl fmt::Display for RowSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RowSource::Dvp => "DVP",
            RowSource::Recent => "RECENT",
            RowSource::Lineup => "LINEUP",
            RowSource::Schedule => "SCHEDULE",
            RowSource::Odds => "ODDS",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    pub source: RowSource,
    /// 0-based position in the input batch.
    pub index: usize,
    #[serde(serialize_with = "reason_text")]
    pub reason: RowError,
}

fn reason_text<S: serde::Serializer>(reason: &RowError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<RejectedRow>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> Normalized<T> {
    fn push(&mut self, source: RowSource, index: usize, result: Result<T, RowError>) {
        match result {
            Ok(entity) => self.accepted.push(entity),
            Err(reason) => {
                tracing::debug!(%source, index, %reason, "rejected row");
                self.rejected.push(RejectedRow {
                    source,
                    index,
                    reason,
                });
            }
        }
    }
}

/// All validated inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSnapshot {
    pub dvp: Vec<DvpRating>,
    pub recent: Vec<RecentStatRecord>,
    pub lineups: Vec<LineupEntry>,
    pub odds: Vec<OddsQuote>,
    pub rejected: Vec<RejectedRow>,
}

pub fn normalize_snapshot(raw: &RawSnapshot, data: &DataConfig) -> NormalizedSnapshot {
    let dvp = normalize_dvp(&raw.dvp);
    let recent = normalize_recent(&raw.recent, data.window_days);
    let (opponents, schedule_rejected) = build_opponent_map(&raw.schedule);
    let lineups = normalize_lineups(&raw.lineups, &opponents);
    let odds = normalize_odds(&raw.odds);

    let mut rejected = Vec::new();
    rejected.extend(dvp.rejected);
    rejected.extend(recent.rejected);
    rejected.extend(schedule_rejected);
    rejected.extend(lineups.rejected);
    rejected.extend(odds.rejected);

    tracing::info!(
        date = %raw.date,
        dvp = dvp.accepted.len(),
        recent = recent.accepted.len(),
        lineups = lineups.accepted.len(),
        odds = odds.accepted.len(),
        rejected = rejected.len(),
        "normalized snapshot"
    );

    NormalizedSnapshot {
        dvp: dvp.accepted,
        recent: recent.accepted,
        lineups: lineups.accepted,
        odds: odds.accepted,
        rejected,
    }
}

/// Validate DVP rows.
///
/// Rows carrying a raw `allowed` amount instead of a favorability are centred
/// against the mean of their (position, stat) group:
/// `favorability = (allowed - mean) / mean * 100`, so a defense allowing less
/// than the league mean pulls projections down.
pub fn normalize_dvp(rows: &[RawDvpRow]) -> Normalized<DvpRating> {
    let mut out = Normalized::default();
    let mut seen = HashSet::new();
    let mut parsed = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let result = dvp_row(row).and_then(|(rating, value)| {
            let key = (rating.team.clone(), rating.position, rating.stat);
            if seen.insert(key) {
                Ok((rating, value))
            } else {
                Err(RowError::Duplicate(format!(
                    "{}/{}/{}",
                    rating.team, rating.position, rating.stat
                )))
            }
        });
        match result {
            Ok(ok) => parsed.push((index, ok)),
            Err(reason) => out.push(RowSource::Dvp, index, Err(reason)),
        }
    }

    let mut sums: HashMap<(Position, StatCategory), (f64, usize)> = HashMap::new();
    for (_, (rating, value)) in &parsed {
        if let DvpValue::Allowed(allowed) = value {
            let entry = sums.entry((rating.position, rating.stat)).or_default();
            entry.0 += allowed;
            entry.1 += 1;
        }
    }

    for (index, (mut rating, value)) in parsed {
        if let DvpValue::Allowed(allowed) = value {
            let mean = sums
                .get(&(rating.position, rating.stat))
                .map(|(sum, n)| sum / *n as f64)
                .unwrap_or(0.0);
            rating.favorability = centred_favorability(allowed, mean);
        }
        out.push(RowSource::Dvp, index, Ok(rating));
    }
    out
}

enum DvpValue {
    Favorability,
    Allowed(f64),
}

/// Percent above (positive) or below (negative) the group mean.
pub fn centred_favorability(allowed: f64, mean: f64) -> f64 {
    if mean > 0.0 {
        (allowed - mean) / mean * 100.0
    } else {
        0.0
    }
}

fn dvp_row(row: &RawDvpRow) -> Result<(DvpRating, DvpValue), RowError> {
    let team = parse_team(&row.team, "team")?;
    let position = parse_position(&row.position)?;
    let stat = parse_stat(&row.stat)?;
    let rank = parse_rank(&row.rank)?;
    let (favorability, value) = match (text(&row.value), text(&row.allowed)) {
        (None, Some(_)) => {
            let allowed = parse_non_negative(&row.allowed, "allowed")?;
            (0.0, DvpValue::Allowed(allowed))
        }
        _ => (parse_number(&row.value, "favorability")?, DvpValue::Favorability),
    };
    Ok((
        DvpRating {
            team,
            position,
            stat,
            rank,
            favorability,
        },
        value,
    ))
}

pub fn normalize_recent(rows: &[RawStatRow], default_window_days: u32) -> Normalized<RecentStatRecord> {
    let mut out = Normalized::default();
    let mut seen = HashSet::new();
    for (index, row) in rows.iter().enumerate() {
        let result = recent_row(row, default_window_days).and_then(|record| {
            if seen.insert((record.player.clone(), record.stat)) {
                Ok(record)
            } else {
                Err(RowError::Duplicate(format!("{}/{}", record.player, record.stat)))
            }
        });
        out.push(RowSource::Recent, index, result);
    }
    out
}

fn recent_row(row: &RawStatRow, default_window_days: u32) -> Result<RecentStatRecord, RowError> {
    let player = player_key(required(&row.player, "player")?);
    if player.is_empty() {
        return Err(RowError::MissingField("player"));
    }
    let stat = parse_stat(&row.stat)?;
    let games_played = parse_count(&row.games, "games_played")?;
    let average = parse_bounded(&row.average, "average", MAX_STAT_AVERAGE)?;
    let minutes_per_game = parse_bounded(&row.mpg, "minutes_per_game", MAX_MINUTES_PER_GAME)?;
    let window_days = match text(&row.window_days) {
        Some(_) => parse_count(&row.window_days, "window_days")?,
        None => default_window_days,
    };
    Ok(RecentStatRecord {
        player,
        stat,
        window_days,
        games_played,
        average,
        minutes_per_game,
    })
}

/// Team → opponent for every scheduled game. Rows missing a side are rejected.
pub fn build_opponent_map(rows: &[RawScheduleRow]) -> (HashMap<String, String>, Vec<RejectedRow>) {
    let mut opponents = HashMap::new();
    let mut rejected = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let game = parse_team(&row.home, "home").and_then(|home| {
            let away = parse_team(&row.away, "away")?;
            Ok((home, away))
        });
        match game {
            Ok((home, away)) => {
                opponents.insert(home.clone(), away.clone());
                opponents.insert(away, home);
            }
            Err(reason) => {
                tracing::debug!(source = %RowSource::Schedule, index, %reason, "rejected row");
                rejected.push(RejectedRow {
                    source: RowSource::Schedule,
                    index,
                    reason,
                });
            }
        }
    }
    (opponents, rejected)
}

pub fn normalize_lineups(
    rows: &[RawLineupRow],
    opponents: &HashMap<String, String>,
) -> Normalized<LineupEntry> {
    let mut out = Normalized::default();
    let mut seen = HashSet::new();
    for (index, row) in rows.iter().enumerate() {
        let result = lineup_row(row, opponents).and_then(|entry| {
            if seen.insert(entry.player.clone()) {
                Ok(entry)
            } else {
                Err(RowError::Duplicate(entry.player))
            }
        });
        out.push(RowSource::Lineup, index, result);
    }
    out
}

fn lineup_row(
    row: &RawLineupRow,
    opponents: &HashMap<String, String>,
) -> Result<LineupEntry, RowError> {
    let display_name = required(&row.player, "player")?.to_string();
    let player = player_key(&display_name);
    if player.is_empty() {
        return Err(RowError::MissingField("player"));
    }
    let team = parse_team(&row.team, "team")?;
    let position = parse_position(&row.position)?;
    if let Some(status) = text(&row.status) {
        if status.to_lowercase().contains("out") {
            return Err(RowError::Inactive(status.to_string()));
        }
    }
    let opponent = match text(&row.opponent) {
        Some(_) => parse_team(&row.opponent, "opponent")?,
        None => opponents
            .get(&team)
            .cloned()
            .ok_or_else(|| RowError::NoOpponent(team.clone()))?,
    };
    Ok(LineupEntry {
        player,
        display_name,
        team,
        opponent,
        position,
    })
}

/// Multiple quotes per player/category are kept as-is.
pub fn normalize_odds(rows: &[RawOddsRow]) -> Normalized<OddsQuote> {
    let mut out = Normalized::default();
    for (index, row) in rows.iter().enumerate() {
        out.push(RowSource::Odds, index, odds_row(row));
    }
    out
}

fn odds_row(row: &RawOddsRow) -> Result<OddsQuote, RowError> {
    let player = player_key(required(&row.player, "player")?);
    let stat = parse_stat(&row.stat)?;
    let line = parse_non_negative(&row.line, "line")?;
    let over_price = parse_price(&row.over_price, "over_price")?;
    let under_price = parse_price(&row.under_price, "under_price")?;
    let sportsbook = required(&row.sportsbook, "sportsbook")?.to_string();
    Ok(OddsQuote {
        player,
        stat,
        line,
        over_price,
        under_price,
        sportsbook,
    })
}

// ── Field parsing ─────────────────────────────────────────────────────

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, RowError> {
    text(value).ok_or(RowError::MissingField(field))
}

fn parse_number(value: &Option<String>, field: &'static str) -> Result<f64, RowError> {
    let raw = required(value, field)?;
    let number: f64 = raw.parse().map_err(|_| RowError::NotNumeric {
        field,
        value: raw.to_string(),
    })?;
    if !number.is_finite() {
        return Err(RowError::NotNumeric {
            field,
            value: raw.to_string(),
        });
    }
    Ok(number)
}

fn parse_non_negative(value: &Option<String>, field: &'static str) -> Result<f64, RowError> {
    let number = parse_number(value, field)?;
    if number < 0.0 {
        return Err(RowError::OutOfRange {
            field,
            value: number.to_string(),
        });
    }
    Ok(number)
}

fn parse_bounded(value: &Option<String>, field: &'static str, max: f64) -> Result<f64, RowError> {
    let number = parse_non_negative(value, field)?;
    if number > max {
        return Err(RowError::OutOfRange {
            field,
            value: number.to_string(),
        });
    }
    Ok(number)
}

/// Whole, non-negative count. Exports often write "5.0".
fn parse_count(value: &Option<String>, field: &'static str) -> Result<u32, RowError> {
    let number = parse_non_negative(value, field)?;
    if number.fract() != 0.0 || number > u32::MAX as f64 {
        return Err(RowError::OutOfRange {
            field,
            value: number.to_string(),
        });
    }
    Ok(number as u32)
}

fn parse_position(value: &Option<String>) -> Result<Position, RowError> {
    let raw = required(value, "position")?;
    Position::from_code(raw).ok_or_else(|| RowError::UnknownEnum {
        field: "position",
        value: raw.to_string(),
    })
}

fn parse_stat(value: &Option<String>) -> Result<StatCategory, RowError> {
    let raw = required(value, "stat")?;
    StatCategory::from_code(raw).ok_or_else(|| RowError::UnknownEnum {
        field: "stat",
        value: raw.to_string(),
    })
}

fn parse_team(value: &Option<String>, field: &'static str) -> Result<String, RowError> {
    let raw = required(value, field)?;
    team_code(raw).ok_or_else(|| RowError::UnknownEnum {
        field,
        value: raw.to_string(),
    })
}

/// Ordinal 1–30, or the tier words used by the DVP summary.
fn parse_rank(value: &Option<String>) -> Result<DefenseRank, RowError> {
    let raw = required(value, "rank")?;
    match raw.to_uppercase().as_str() {
        "WORST" => return Ok(DefenseRank::WORST),
        "BEST" => return Ok(DefenseRank::BEST),
        _ => {}
    }
    let ordinal: u8 = raw.parse().map_err(|_| RowError::UnknownEnum {
        field: "rank",
        value: raw.to_string(),
    })?;
    DefenseRank::new(ordinal).ok_or_else(|| RowError::OutOfRange {
        field: "rank",
        value: raw.to_string(),
    })
}

fn parse_price(value: &Option<String>, field: &'static str) -> Result<f64, RowError> {
    let raw = required(value, field)?;
    let price = parse_american_odds(raw).ok_or_else(|| RowError::NotNumeric {
        field,
        value: raw.to_string(),
    })?;
    if !is_valid_american(price) {
        return Err(RowError::OutOfRange {
            field,
            value: raw.to_string(),
        });
    }
    Ok(price)
}

/// Parse an American odds string: "-150", "+130", "EVEN".
pub fn parse_american_odds(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("EVEN") {
        return Some(100.0);
    }
    s.parse::<f64>().ok().filter(|p| p.is_finite())
}

// ── Identity normalization ────────────────────────────────────────────

/// Canonical player id: lowercase, trimmed, injury tags stripped.
pub fn player_key(name: &str) -> String {
    let mut key = name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    for suffix in [" off inj", " inj", " out", " q", " gtd"] {
        if let Some(stripped) = key.strip_suffix(suffix) {
            key = stripped.to_string();
        }
    }
    key.trim().to_string()
}

/// Canonical three-letter NBA code from a full name, city, or site-specific code.
pub fn team_code(name: &str) -> Option<String> {
    let upper = name.trim().to_uppercase();
    let upper = upper.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some(code) = nba_team_code(&upper) {
        return Some(code.to_string());
    }
    if (2..=3).contains(&upper.len()) && upper.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(upper);
    }
    None
}

fn nba_team_code(name: &str) -> Option<&'static str> {
    match name {
        "ATLANTA HAWKS" | "ATLANTA" => Some("ATL"),
        "BOSTON CELTICS" | "BOSTON" => Some("BOS"),
        "BROOKLYN NETS" | "BROOKLYN" | "BRK" | "BKN" => Some("BKN"),
        "CHARLOTTE HORNETS" | "CHARLOTTE" | "CHO" => Some("CHA"),
        "CHICAGO BULLS" | "CHICAGO" => Some("CHI"),
        "CLEVELAND CAVALIERS" | "CLEVELAND" => Some("CLE"),
        "DALLAS MAVERICKS" | "DALLAS" => Some("DAL"),
        "DENVER NUGGETS" | "DENVER" => Some("DEN"),
        "DETROIT PISTONS" | "DETROIT" => Some("DET"),
        "GOLDEN STATE WARRIORS" | "GOLDEN STATE" | "GS" => Some("GSW"),
        "HOUSTON ROCKETS" | "HOUSTON" => Some("HOU"),
        "INDIANA PACERS" | "INDIANA" => Some("IND"),
        "LOS ANGELES CLIPPERS" | "LA CLIPPERS" => Some("LAC"),
        "LOS ANGELES LAKERS" | "LA LAKERS" => Some("LAL"),
        "MEMPHIS GRIZZLIES" | "MEMPHIS" => Some("MEM"),
        "MIAMI HEAT" | "MIAMI" => Some("MIA"),
        "MILWAUKEE BUCKS" | "MILWAUKEE" => Some("MIL"),
        "MINNESOTA TIMBERWOLVES" | "MINNESOTA" => Some("MIN"),
        "NEW ORLEANS PELICANS" | "NEW ORLEANS" | "NO" => Some("NOP"),
        "NEW YORK KNICKS" | "NEW YORK" | "NY" => Some("NYK"),
        "OKLAHOMA CITY THUNDER" | "OKLAHOMA CITY" => Some("OKC"),
        "ORLANDO MAGIC" | "ORLANDO" => Some("ORL"),
        "PHILADELPHIA 76ERS" | "PHILADELPHIA SIXERS" | "PHILADELPHIA" => Some("PHI"),
        "PHOENIX SUNS" | "PHOENIX" | "PHO" => Some("PHX"),
        "PORTLAND TRAIL BLAZERS" | "PORTLAND" => Some("POR"),
        "SACRAMENTO KINGS" | "SACRAMENTO" => Some("SAC"),
        "SAN ANTONIO SPURS" | "SAN ANTONIO" | "SA" => Some("SAS"),
        "TORONTO RAPTORS" | "TORONTO" => Some("TOR"),
        "UTAH JAZZ" | "UTAH" => Some("UTA"),
        "WASHINGTON WIZARDS" | "WASHINGTON" => Some("WAS"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn dvp(team: &str, pos: &str, stat: &str, rank: &str, value: &str) -> RawDvpRow {
        RawDvpRow {
            team: s(team),
            position: s(pos),
            stat: s(stat),
            rank: s(rank),
            value: s(value),
            allowed: None,
        }
    }

    fn allowed(team: &str, rank: &str, value: &str) -> RawDvpRow {
        RawDvpRow {
            team: s(team),
            position: s("C"),
            stat: s("PTS"),
            rank: s(rank),
            value: None,
            allowed: s(value),
        }
    }

    #[test]
    fn test_player_key_strips_injury_tags() {
        assert_eq!(player_key("  Luka  Doncic GTD"), "luka doncic");
        assert_eq!(player_key("Joel Embiid Off Inj"), "joel embiid");
        assert_eq!(player_key("Jalen Green"), "jalen green");
    }

    #[test]
    fn test_team_code_variants() {
        assert_eq!(team_code("Boston Celtics").as_deref(), Some("BOS"));
        assert_eq!(team_code("pho").as_deref(), Some("PHX"));
        assert_eq!(team_code("BRK").as_deref(), Some("BKN"));
        assert_eq!(team_code("LAL").as_deref(), Some("LAL"));
        assert_eq!(team_code("Gotham Rogues"), None);
        assert_eq!(team_code("L4L"), None);
    }

    #[test]
    fn test_parse_american_odds() {
        assert_eq!(parse_american_odds("-150"), Some(-150.0));
        assert_eq!(parse_american_odds("+130"), Some(130.0));
        assert_eq!(parse_american_odds("even"), Some(100.0));
        assert_eq!(parse_american_odds("n/a"), None);
    }

    #[test]
    fn test_dvp_bad_rows_are_isolated() {
        let rows = vec![
            dvp("LAC", "C", "PTS", "1", "8.5"),
            dvp("LAC", "C", "PTS", "2", "7.0"), // duplicate key
            dvp("BOS", "G", "PTS", "3", "1.0"), // unknown position
            dvp("BOS", "PG", "PTS", "WORST", "abc"),
            dvp("BOS", "PG", "REB", "31", "1.0"),
            RawDvpRow::default(),
            dvp("Miami Heat", "SF", "AST", "BEST", "-4.2"),
        ];
        let out = normalize_dvp(&rows);
        assert_eq!(out.accepted.len(), 2);
        assert_eq!(out.accepted[1].team, "MIA");
        assert_eq!(out.accepted[1].rank, DefenseRank::BEST);

        let reasons: Vec<_> = out.rejected.iter().map(|r| (r.index, r.reason.kind())).collect();
        assert_eq!(
            reasons,
            vec![
                (1, "duplicate key"),
                (2, "unknown enum"),
                (3, "non-numeric value"),
                (4, "out of range"),
                (5, "missing field"),
            ]
        );
    }

    #[test]
    fn test_allowed_values_centred_on_group_mean() {
        let out = normalize_dvp(&[
            allowed("LAC", "WORST", "28.0"),
            allowed("BOS", "BEST", "20.0"),
            allowed("DEN", "15", "24.0"),
        ]);
        assert!(out.rejected.is_empty());
        // mean = 24.0; LAC (28 - 24) / 24 * 100 = 16.67, BOS -16.67, DEN 0
        let fav: Vec<f64> = out.accepted.iter().map(|r| r.favorability).collect();
        assert!((fav[0] - 16.6667).abs() < 1e-3);
        assert!((fav[1] + 16.6667).abs() < 1e-3);
        assert_eq!(fav[2], 0.0);
        assert_eq!(out.accepted[1].rank, DefenseRank::BEST);
    }

    #[test]
    fn test_allowed_single_row_is_neutral_and_value_wins() {
        let out = normalize_dvp(&[allowed("BOS", "BEST", "20.1")]);
        assert_eq!(out.accepted[0].favorability, 0.0);

        let mut both = dvp("BOS", "C", "PTS", "BEST", "-3.5");
        both.allowed = s("20.1");
        let out = normalize_dvp(&[both, allowed("LAC", "1", "-2")]);
        assert_eq!(out.accepted[0].favorability, -3.5);
        assert!(matches!(out.rejected[0].reason, RowError::OutOfRange { .. }));
    }

    #[test]
    fn test_recent_rejects_negative_minutes_and_average() {
        let row = |avg: &str, mpg: &str| RawStatRow {
            player: s("Jalen Brunson"),
            stat: s("PTS"),
            window_days: None,
            games: s("5"),
            average: s(avg),
            mpg: s(mpg),
        };
        let out = normalize_recent(&[row("-1", "30"), row("22", "-3"), row("22", "30")], 10);
        assert_eq!(out.accepted.len(), 1);
        assert_eq!(out.accepted[0].window_days, 10);
        assert_eq!(out.accepted[0].player, "jalen brunson");
        assert!(out
            .rejected
            .iter()
            .all(|r| matches!(r.reason, RowError::OutOfRange { .. })));
    }

    #[test]
    fn test_recent_rejects_implausible_values() {
        let row = |avg: &str, mpg: &str| RawStatRow {
            player: s("Nikola Jokic"),
            stat: s("PTS"),
            window_days: None,
            games: s("5"),
            average: s(avg),
            mpg: s(mpg),
        };
        let out = normalize_recent(&[row("1.5e308", "30"), row("22", "96")], 10);
        assert!(out.accepted.is_empty());
        assert_eq!(out.rejected.len(), 2);
        assert!(out.rejected.iter().all(|r| r.reason.kind() == "out of range"));
    }

    #[test]
    fn test_recent_games_accepts_float_text() {
        let row = RawStatRow {
            player: s("A"),
            stat: s("REB"),
            window_days: s("7"),
            games: s("4.0"),
            average: s("9.1"),
            mpg: s("31.2"),
        };
        let out = normalize_recent(&[row.clone(), RawStatRow { games: s("4.5"), ..row }], 10);
        assert_eq!(out.accepted[0].games_played, 4);
        assert_eq!(out.accepted[0].window_days, 7);
        assert_eq!(out.rejected.len(), 1);
    }

    #[test]
    fn test_lineup_opponent_from_schedule() {
        let schedule = vec![
            RawScheduleRow {
                home: s("TOR"),
                away: s("Indiana Pacers"),
            },
            RawScheduleRow {
                home: s("BOS"),
                away: None,
            },
        ];
        let (opponents, rejected) = build_opponent_map(&schedule);
        assert_eq!(opponents.get("IND").map(String::as_str), Some("TOR"));
        assert_eq!(rejected.len(), 1);

        let lineups = vec![
            RawLineupRow {
                player: s("Scottie Barnes"),
                team: s("TOR"),
                opponent: None,
                position: s("PF"),
                status: None,
            },
            RawLineupRow {
                player: s("Tyrese Haliburton"),
                team: s("IND"),
                opponent: None,
                position: s("PG"),
                status: s("Out"),
            },
            RawLineupRow {
                player: s("Jayson Tatum"),
                team: s("BOS"),
                opponent: None,
                position: s("SF"),
                status: None,
            },
        ];
        let out = normalize_lineups(&lineups, &opponents);
        assert_eq!(out.accepted.len(), 1);
        assert_eq!(out.accepted[0].opponent, "IND");
        assert!(matches!(out.rejected[0].reason, RowError::Inactive(_)));
        assert_eq!(out.rejected[1].reason, RowError::NoOpponent("BOS".to_string()));
    }

    #[test]
    fn test_odds_preserves_multiple_books() {
        let quote = |book: &str, over: &str| RawOddsRow {
            player: s("Jalen Brunson"),
            stat: s("PTS"),
            line: s("26.5"),
            over_price: s(over),
            under_price: s("-110"),
            sportsbook: s(book),
        };
        let out = normalize_odds(&[
            quote("DraftKings", "-115"),
            quote("FanDuel", "EVEN"),
            quote("BetMGM", "-50"),
        ]);
        assert_eq!(out.accepted.len(), 2);
        assert_eq!(out.accepted[1].over_price, 100.0);
        assert_eq!(out.rejected[0].index, 2);
    }
}
