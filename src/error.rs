use thiserror::Error;

/// Why a single raw row was rejected by the normalizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not numeric: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("field `{field}` has unknown value {value:?}")]
    UnknownEnum { field: &'static str, value: String },

    #[error("field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: String },

    #[error("duplicate key {0}")]
    Duplicate(String),

    #[error("player is inactive ({0})")]
    Inactive(String),

    #[error("no opponent for team {0}")]
    NoOpponent(String),
}

impl RowError {
    /// Short reason label used when grouping rejections for display.
    pub fn kind(&self) -> &'static str {
        match self {
            RowError::MissingField(_) => "missing field",
            RowError::NotNumeric { .. } => "non-numeric value",
            RowError::UnknownEnum { .. } => "unknown enum",
            RowError::OutOfRange { .. } => "out of range",
            RowError::Duplicate(_) => "duplicate key",
            RowError::Inactive(_) => "inactive",
            RowError::NoOpponent(_) => "no opponent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdgeError {
    #[error("invalid line {0}: must be a non-zero finite number")]
    InvalidLine(f64),

    #[error("invalid projection {0}: must be finite")]
    InvalidProjection(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("blend weights must be non-negative (recent={recent}, dvp={dvp})")]
    NegativeWeight { recent: f64, dvp: f64 },

    #[error("blend weights must sum to 1 (recent={recent}, dvp={dvp})")]
    WeightSum { recent: f64, dvp: f64 },

    #[error("edge thresholds must satisfy 0 <= low < mid < high (got {low}, {mid}, {high})")]
    Thresholds { low: f64, mid: f64, high: f64 },

    #[error("top_plays_per_category must be at least 1")]
    ZeroTopPlays,

    #[error("`{field}` must be positive and finite (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("`{field}` must be within [{min}, {max}] (got {value})")]
    Range {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
