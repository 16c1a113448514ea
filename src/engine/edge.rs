use super::types::{EdgeResult, PlayRef, ProjectedPlay, RecommendationTier, Side};
use crate::config::EdgeConfig;
use crate::error::EdgeError;

/// Percentage deviation of the projection from the line.
///
/// `edge = (projection - line) / |line| * 100`. Positive favors the over.
/// Dividing by the magnitude keeps the sign tied to `projection - line` even
/// for a negative line. A zero or non-finite line, or a non-finite
/// projection, is rejected.
pub fn edge_percent(projection: f64, line: f64) -> Result<f64, EdgeError> {
    if line == 0.0 || !line.is_finite() {
        return Err(EdgeError::InvalidLine(line));
    }
    if !projection.is_finite() {
        return Err(EdgeError::InvalidProjection(projection));
    }
    Ok((projection - line) / line.abs() * 100.0)
}

/// Bracket on absolute edge: `[0, low)` PASS, `[low, mid)` SMALL,
/// `[mid, high)` MEDIUM, `[high, ..)` LARGE.
pub fn tier_for(edge_percent: f64, config: &EdgeConfig) -> RecommendationTier {
    let magnitude = edge_percent.abs();
    if magnitude < config.low_threshold {
        RecommendationTier::Pass
    } else if magnitude < config.mid_threshold {
        RecommendationTier::Small
    } else if magnitude < config.high_threshold {
        RecommendationTier::Medium
    } else {
        RecommendationTier::Large
    }
}

pub fn side_for(edge_percent: f64) -> Side {
    if edge_percent > 0.0 {
        Side::Over
    } else if edge_percent < 0.0 {
        Side::Under
    } else {
        Side::Push
    }
}

/// Edge of a ranked play against a user-entered line.
pub fn compute_edge(play: &ProjectedPlay, line: f64, config: &EdgeConfig) -> Result<EdgeResult, EdgeError> {
    let mut result = compute_edge_for_projection(play.blended_projection, line, config)?;
    result.play = Some(PlayRef {
        player: play.player.clone(),
        stat: play.stat,
        rank: play.rank,
    });
    Ok(result)
}

/// Edge of a standalone projection (no ranked play behind it).
pub fn compute_edge_for_projection(
    projection: f64,
    line: f64,
    config: &EdgeConfig,
) -> Result<EdgeResult, EdgeError> {
    let edge = edge_percent(projection, line)?;
    Ok(EdgeResult {
        play: None,
        entered_line: line,
        projected_value: projection,
        edge_percent: edge,
        side: side_for(edge),
        tier: tier_for(edge, config),
    })
}
