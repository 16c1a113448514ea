use crate::engine::types::Position;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Tolerance used when checking that the blend weights sum to one.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Top-level configuration. Built once at startup, validated, and then only
/// ever passed around by shared reference.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub edge: EdgeConfig,
    #[serde(default)]
    pub stake: StakeConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Minimum games in the recent window before a player is scored at all.
    #[serde(default = "default_min_games")]
    pub min_games: u32,
    #[serde(default = "default_top_plays")]
    pub top_plays_per_category: usize,
    /// Most plays one player may hold across all categories. 0 is no limit.
    #[serde(default)]
    pub max_plays_per_player: usize,
    /// When non-empty, only these players are joined to the slate.
    #[serde(default)]
    pub watchlist: Vec<String>,
}

fn default_min_games() -> u32 { 2 }
fn default_top_plays() -> usize { 8 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_games: default_min_games(),
            top_plays_per_category: default_top_plays(),
            max_plays_per_player: 0,
            watchlist: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectionConfig {
    #[serde(default = "default_half")]
    pub recent_weight: f64,
    #[serde(default = "default_half")]
    pub dvp_weight: f64,
    /// Favorability units per 100% adjustment (favorability 100 doubles the baseline
    /// for a player at exactly the league-average minutes).
    #[serde(default = "default_favorability_scale")]
    pub favorability_scale: f64,
    /// Cap on the player's minutes relative to the positional baseline.
    #[serde(default = "default_max_minutes_ratio")]
    pub max_minutes_ratio: f64,
    #[serde(default)]
    pub league_minutes: PositionMinutes,
}

fn default_half() -> f64 { 0.5 }
fn default_favorability_scale() -> f64 { 100.0 }
fn default_max_minutes_ratio() -> f64 { 1.5 }

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            recent_weight: default_half(),
            dvp_weight: default_half(),
            favorability_scale: default_favorability_scale(),
            max_minutes_ratio: default_max_minutes_ratio(),
            league_minutes: PositionMinutes::default(),
        }
    }
}

impl ProjectionConfig {
    pub fn baseline_minutes(&self, position: Position) -> f64 {
        match position {
            Position::PointGuard => self.league_minutes.pg,
            Position::ShootingGuard => self.league_minutes.sg,
            Position::SmallForward => self.league_minutes.sf,
            Position::PowerForward => self.league_minutes.pf,
            Position::Center => self.league_minutes.c,
        }
    }
}

/// League-average minutes per game for a rotation player at each position.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PositionMinutes {
    pub pg: f64,
    pub sg: f64,
    pub sf: f64,
    pub pf: f64,
    pub c: f64,
}

impl Default for PositionMinutes {
    fn default() -> Self {
        Self {
            pg: 29.0,
            sg: 28.0,
            sf: 28.0,
            pf: 27.0,
            c: 26.0,
        }
    }
}

impl PositionMinutes {
    pub fn uniform(minutes: f64) -> Self {
        Self {
            pg: minutes,
            sg: minutes,
            sf: minutes,
            pf: minutes,
            c: minutes,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// Exponent applied to `ln(1 + games_played)`.
    #[serde(default = "default_confidence_exponent")]
    pub confidence_exponent: f64,
    /// Favorability used for candidates with no matching DVP rating.
    #[serde(default)]
    pub neutral_favorability: f64,
}

fn default_confidence_exponent() -> f64 { 1.0 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            confidence_exponent: default_confidence_exponent(),
            neutral_favorability: 0.0,
        }
    }
}

/// Edge tier brackets, in absolute edge percent.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EdgeConfig {
    pub low_threshold: f64,
    pub mid_threshold: f64,
    pub high_threshold: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 3.0,
            mid_threshold: 8.0,
            high_threshold: 15.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StakeConfig {
    pub kelly_fraction: f64,
    /// Full-Kelly fraction is clamped to this before scaling.
    pub kelly_cap: f64,
    pub base_win_probability: f64,
    /// Win probability gained per point of absolute edge percent.
    pub win_prob_per_edge_pct: f64,
    pub min_win_probability: f64,
    pub max_win_probability: f64,
}

impl Default for StakeConfig {
    fn default() -> Self {
        Self {
            kelly_fraction: 0.25,
            kelly_cap: 0.25,
            base_win_probability: 0.50,
            win_prob_per_edge_pct: 0.005,
            min_win_probability: 0.45,
            max_win_probability: 0.75,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// Window length stamped on recent-stat rows that don't carry one.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

fn default_snapshot_dir() -> PathBuf { PathBuf::from("outputs") }
fn default_window_days() -> u32 { 10 }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            window_days: default_window_days(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate. Any range problem is fatal before a run starts.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.engine.top_plays_per_category == 0 {
            return Err(ConfigError::ZeroTopPlays);
        }

        let p = &self.projection;
        if p.recent_weight < 0.0 || p.dvp_weight < 0.0 {
            return Err(ConfigError::NegativeWeight {
                recent: p.recent_weight,
                dvp: p.dvp_weight,
            });
        }
        let sum_error = (p.recent_weight + p.dvp_weight - 1.0).abs();
        if sum_error.is_nan() || sum_error > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightSum {
                recent: p.recent_weight,
                dvp: p.dvp_weight,
            });
        }
        require_positive("projection.favorability_scale", p.favorability_scale)?;
        require_positive("projection.max_minutes_ratio", p.max_minutes_ratio)?;
        let m = &p.league_minutes;
        for (field, value) in [
            ("projection.league_minutes.pg", m.pg),
            ("projection.league_minutes.sg", m.sg),
            ("projection.league_minutes.sf", m.sf),
            ("projection.league_minutes.pf", m.pf),
            ("projection.league_minutes.c", m.c),
        ] {
            require_positive(field, value)?;
        }

        require_positive("scoring.confidence_exponent", self.scoring.confidence_exponent)?;
        if !self.scoring.neutral_favorability.is_finite() {
            return Err(ConfigError::NonPositive {
                field: "scoring.neutral_favorability",
                value: self.scoring.neutral_favorability,
            });
        }

        let e = &self.edge;
        let ordered = e.low_threshold >= 0.0
            && e.low_threshold < e.mid_threshold
            && e.mid_threshold < e.high_threshold
            && e.high_threshold.is_finite();
        if !ordered {
            return Err(ConfigError::Thresholds {
                low: e.low_threshold,
                mid: e.mid_threshold,
                high: e.high_threshold,
            });
        }

        let s = &self.stake;
        require_range("stake.kelly_fraction", s.kelly_fraction, 0.0, 1.0)?;
        require_range("stake.kelly_cap", s.kelly_cap, 0.0, 1.0)?;
        require_range("stake.min_win_probability", s.min_win_probability, 0.0, 1.0)?;
        require_range(
            "stake.max_win_probability",
            s.max_win_probability,
            s.min_win_probability,
            1.0,
        )?;
        require_range(
            "stake.base_win_probability",
            s.base_win_probability,
            s.min_win_probability,
            s.max_win_probability,
        )?;
        require_range("stake.win_prob_per_edge_pct", s.win_prob_per_edge_pct, 0.0, 1.0)?;

        Ok(())
    }
}

fn require_positive(field: &'static str, value: f64) -> std::result::Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn require_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> std::result::Result<(), ConfigError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::Range {
            field,
            value,
            min,
            max,
        })
    }
}
