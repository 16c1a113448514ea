use serde::Serialize;
use std::fmt;

/// Canonical, validated entities. Only the normalizer constructs these from raw
/// rows; everything downstream takes them by reference.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Position {
    #[serde(rename = "PG")]
    PointGuard,
    #[serde(rename = "SG")]
    ShootingGuard,
    #[serde(rename = "SF")]
    SmallForward,
    #[serde(rename = "PF")]
    PowerForward,
    #[serde(rename = "C")]
    Center,
}

impl Position {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "PG" => Some(Position::PointGuard),
            "SG" => Some(Position::ShootingGuard),
            "SF" => Some(Position::SmallForward),
            "PF" => Some(Position::PowerForward),
            "C" => Some(Position::Center),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::PointGuard => "PG",
            Position::ShootingGuard => "SG",
            Position::SmallForward => "SF",
            Position::PowerForward => "PF",
            Position::Center => "C",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StatCategory {
    #[serde(rename = "PTS")]
    Points,
    #[serde(rename = "REB")]
    Rebounds,
    #[serde(rename = "AST")]
    Assists,
    #[serde(rename = "3PM")]
    Threes,
    #[serde(rename = "STL")]
    Steals,
    #[serde(rename = "BLK")]
    Blocks,
    #[serde(rename = "TOV")]
    Turnovers,
    #[serde(rename = "PR")]
    PointsRebounds,
    #[serde(rename = "PA")]
    PointsAssists,
    #[serde(rename = "PRA")]
    PointsReboundsAssists,
}

impl StatCategory {
    pub const ALL: [StatCategory; 10] = [
        StatCategory::Points,
        StatCategory::Rebounds,
        StatCategory::Assists,
        StatCategory::Threes,
        StatCategory::Steals,
        StatCategory::Blocks,
        StatCategory::Turnovers,
        StatCategory::PointsRebounds,
        StatCategory::PointsAssists,
        StatCategory::PointsReboundsAssists,
    ];

    /// Accepts our own codes plus the column names used by the box-score exports.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "PTS" | "POINTS" => Some(StatCategory::Points),
            "REB" | "TRB" | "REBOUNDS" => Some(StatCategory::Rebounds),
            "AST" | "ASSISTS" => Some(StatCategory::Assists),
            "3PM" | "FG3" | "3PT" | "THREES" => Some(StatCategory::Threes),
            "STL" | "STEALS" => Some(StatCategory::Steals),
            "BLK" | "BLOCKS" => Some(StatCategory::Blocks),
            "TOV" | "TO" | "TURNOVERS" => Some(StatCategory::Turnovers),
            "PR" => Some(StatCategory::PointsRebounds),
            "PA" => Some(StatCategory::PointsAssists),
            "PRA" => Some(StatCategory::PointsReboundsAssists),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StatCategory::Points => "PTS",
            StatCategory::Rebounds => "REB",
            StatCategory::Assists => "AST",
            StatCategory::Threes => "3PM",
            StatCategory::Steals => "STL",
            StatCategory::Blocks => "BLK",
            StatCategory::Turnovers => "TOV",
            StatCategory::PointsRebounds => "PR",
            StatCategory::PointsAssists => "PA",
            StatCategory::PointsReboundsAssists => "PRA",
        }
    }

    /// Component categories for combo props; empty for single stats.
    pub fn components(&self) -> &'static [StatCategory] {
        match self {
            StatCategory::PointsRebounds => &[StatCategory::Points, StatCategory::Rebounds],
            StatCategory::PointsAssists => &[StatCategory::Points, StatCategory::Assists],
            StatCategory::PointsReboundsAssists => &[
                StatCategory::Points,
                StatCategory::Rebounds,
                StatCategory::Assists,
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// League-wide defensive rank: 1 = softest matchup for the offense, 30 = toughest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DefenseRank(u8);

impl DefenseRank {
    pub const WORST: DefenseRank = DefenseRank(1);
    pub const BEST: DefenseRank = DefenseRank(30);

    pub fn new(ordinal: u8) -> Option<Self> {
        (1..=30).contains(&ordinal).then_some(DefenseRank(ordinal))
    }

    pub fn ordinal(&self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DvpRating {
    pub team: String,
    pub position: Position,
    pub stat: StatCategory,
    pub rank: DefenseRank,
    /// Zero is league average; higher is more favorable for the over.
    pub favorability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentStatRecord {
    pub player: String,
    pub stat: StatCategory,
    pub window_days: u32,
    pub games_played: u32,
    pub average: f64,
    pub minutes_per_game: f64,
}

/// A player on today's slate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupEntry {
    pub player: String,
    pub display_name: String,
    pub team: String,
    pub opponent: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsQuote {
    pub player: String,
    pub stat: StatCategory,
    pub line: f64,
    /// American odds.
    pub over_price: f64,
    pub under_price: f64,
    pub sportsbook: String,
}

impl OddsQuote {
    pub fn price(&self, side: Side) -> Option<f64> {
        match side {
            Side::Over => Some(self.over_price),
            Side::Under => Some(self.under_price),
            Side::Push => None,
        }
    }
}

/// How the DVP half of a projection was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchupState {
    Applied,
    /// No usable rating for the opponent/position/category.
    NoRating,
    /// Player logged zero minutes; no adjustment applied.
    NoMinutes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPlay {
    pub player: String,
    pub display_name: String,
    pub team: String,
    pub opponent: String,
    pub position: Position,
    pub stat: StatCategory,
    pub games_played: u32,
    pub minutes_per_game: f64,
    pub recent_component: f64,
    pub dvp_component: f64,
    pub defense_rank: Option<DefenseRank>,
    pub favorability: Option<f64>,
    pub matchup: MatchupState,
    pub blended_projection: f64,
    pub score: f64,
    /// 1-based within `stat`.
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Over,
    Under,
    Push,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Over => "OVER",
            Side::Under => "UNDER",
            Side::Push => "PUSH",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecommendationTier {
    Pass,
    Small,
    Medium,
    Large,
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecommendationTier::Pass => "PASS",
            RecommendationTier::Small => "SMALL",
            RecommendationTier::Medium => "MEDIUM",
            RecommendationTier::Large => "LARGE",
        })
    }
}

/// Identifies the play an edge was computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayRef {
    pub player: String,
    pub stat: StatCategory,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeResult {
    /// `None` when computed from a standalone projection.
    pub play: Option<PlayRef>,
    pub entered_line: f64,
    pub projected_value: f64,
    pub edge_percent: f64,
    pub side: Side,
    pub tier: RecommendationTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeSuggestion {
    pub win_probability: f64,
    pub kelly_full_percent: f64,
    pub kelly_adjusted_percent: f64,
    pub stake_amount: f64,
    /// Win probability minus the book probability, in percentage points.
    pub edge_over_book_percent: f64,
}
