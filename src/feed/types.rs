use chrono::NaiveDate;
use serde::Deserialize;

/// Raw, untrusted rows as produced by the scrapers. Every field is optional
/// text; the normalizer decides what is usable.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDvpRow {
    #[serde(alias = "TEAM")]
    pub team: Option<String>,
    #[serde(alias = "POSITION", alias = "pos")]
    pub position: Option<String>,
    #[serde(alias = "STAT")]
    pub stat: Option<String>,
    #[serde(alias = "rank_label", alias = "RANK")]
    pub rank: Option<String>,
    /// Favorability centred on zero; positive favors the over.
    #[serde(alias = "favorability", alias = "VALUE")]
    pub value: Option<String>,
    /// Raw amount the defense allows per game. Used when `value` is absent.
    #[serde(alias = "opp_dvp_value", alias = "dvp_value")]
    pub allowed: Option<String>,
}

/// Long format: one row per player and category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStatRow {
    pub player: Option<String>,
    pub stat: Option<String>,
    #[serde(alias = "window")]
    pub window_days: Option<String>,
    #[serde(alias = "games_played", alias = "g")]
    pub games: Option<String>,
    #[serde(alias = "avg", alias = "recent_avg")]
    pub average: Option<String>,
    #[serde(alias = "minutes_per_game", alias = "mp_per_g")]
    pub mpg: Option<String>,
}

/// Wide format: the last-N-days export, one row per player with per-game columns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPlayerLine {
    pub player: Option<String>,
    pub team: Option<String>,
    pub games: Option<String>,
    pub mpg: Option<String>,
    pub pts: Option<String>,
    #[serde(alias = "trb")]
    pub reb: Option<String>,
    pub ast: Option<String>,
    #[serde(alias = "3p", alias = "3pm", alias = "fg3m")]
    pub fg3: Option<String>,
    pub stl: Option<String>,
    pub blk: Option<String>,
    pub tov: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLineupRow {
    pub player: Option<String>,
    pub team: Option<String>,
    #[serde(alias = "opp")]
    pub opponent: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawScheduleRow {
    #[serde(alias = "home_team", alias = "Home")]
    pub home: Option<String>,
    #[serde(alias = "away_team", alias = "Away")]
    pub away: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOddsRow {
    pub player: Option<String>,
    pub stat: Option<String>,
    pub line: Option<String>,
    #[serde(alias = "over")]
    pub over_price: Option<String>,
    #[serde(alias = "under")]
    pub under_price: Option<String>,
    #[serde(alias = "book")]
    pub sportsbook: Option<String>,
}

/// Everything one date's run needs, still unvalidated.
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    pub date: NaiveDate,
    pub dvp: Vec<RawDvpRow>,
    pub recent: Vec<RawStatRow>,
    pub lineups: Vec<RawLineupRow>,
    pub schedule: Vec<RawScheduleRow>,
    pub odds: Vec<RawOddsRow>,
}

impl RawSnapshot {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            dvp: Vec::new(),
            recent: Vec::new(),
            lineups: Vec::new(),
            schedule: Vec::new(),
            odds: Vec::new(),
        }
    }
}
