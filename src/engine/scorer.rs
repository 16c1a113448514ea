//! Matchup scoring.
//!
//! `score = favorability * ln(1 + games_played)^confidence_exponent`
//!
//! Favorability drives the ranking; sample size is a confidence multiplier that
//! grows with games played. Players under `min_games` never become candidates.

use super::projection::Projection;
use crate::config::{EngineConfig, ScoringConfig};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub projection: Projection,
    pub score: f64,
}

pub fn confidence(games_played: u32, exponent: f64) -> f64 {
    (1.0 + games_played as f64).ln().powf(exponent)
}

pub fn matchup_score(favorability: f64, games_played: u32, config: &ScoringConfig) -> f64 {
    favorability * confidence(games_played, config.confidence_exponent)
}

pub fn score_candidates(
    projections: Vec<Projection>,
    engine: &EngineConfig,
    scoring: &ScoringConfig,
) -> Vec<ScoredCandidate> {
    let total = projections.len();
    let candidates: Vec<ScoredCandidate> = projections
        .into_iter()
        .filter(|p| {
            let eligible = p.games_played >= engine.min_games;
            if !eligible {
                tracing::debug!(
                    player = %p.player,
                    stat = %p.stat,
                    games = p.games_played,
                    min_games = engine.min_games,
                    "below minimum games, excluded"
                );
            }
            eligible
        })
        .map(|projection| {
            let favorability = projection
                .favorability
                .unwrap_or(scoring.neutral_favorability);
            let score = matchup_score(favorability, projection.games_played, scoring);
            ScoredCandidate { projection, score }
        })
        .collect();

    tracing::info!(
        candidates = candidates.len(),
        excluded = total - candidates.len(),
        "scored candidates"
    );
    candidates
}

/// Total order: score desc, then recent average desc, then player id asc.
pub fn compare_candidates(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            b.projection
                .recent_average
                .total_cmp(&a.projection.recent_average)
        })
        .then_with(|| a.projection.player.cmp(&b.projection.player))
}
