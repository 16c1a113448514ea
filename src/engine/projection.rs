//! Blended stat projection from recent form and the opponent's DVP rating.
//!
//! Model:
//!   `factor = 1 + (favorability / favorability_scale) * min(mpg / baseline_mpg, max_ratio)`
//!   `dvp_component = recent_average * factor`
//!   `blended = w_recent * recent_average + w_dvp * dvp_component`
//!
//! The minutes ratio discounts a bench player's matchup edge in proportion to
//! reduced opportunity. With no rating, or zero minutes, the projection is the
//! recent average unweighted.

use super::types::{DefenseRank, DvpRating, LineupEntry, MatchupState, Position, RecentStatRecord, StatCategory};
use super::normalize::player_key;
use crate::config::ProjectionConfig;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// A recent-stat record joined to today's matchup and projected.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub player: String,
    pub display_name: String,
    pub team: String,
    pub opponent: String,
    pub position: Position,
    pub stat: StatCategory,
    pub games_played: u32,
    pub minutes_per_game: f64,
    pub recent_average: f64,
    pub defense_rank: Option<DefenseRank>,
    pub favorability: Option<f64>,
    pub dvp_component: f64,
    pub matchup: MatchupState,
    pub blended: f64,
}

/// Multiplier applied to the recent baseline. Never negative.
pub fn dvp_adjustment_factor(
    favorability: f64,
    minutes_per_game: f64,
    baseline_minutes: f64,
    config: &ProjectionConfig,
) -> f64 {
    let minutes_ratio = (minutes_per_game / baseline_minutes).min(config.max_minutes_ratio);
    (1.0 + favorability / config.favorability_scale * minutes_ratio).max(0.0)
}

/// Returns `(dvp_component, blended, state)`.
pub fn blend(
    recent_average: f64,
    favorability: Option<f64>,
    minutes_per_game: f64,
    position: Position,
    config: &ProjectionConfig,
) -> (f64, f64, MatchupState) {
    let Some(favorability) = favorability else {
        return (0.0, recent_average, MatchupState::NoRating);
    };
    if minutes_per_game <= 0.0 {
        return (0.0, recent_average, MatchupState::NoMinutes);
    }

    let baseline = config.baseline_minutes(position);
    let factor = dvp_adjustment_factor(favorability, minutes_per_game, baseline, config);
    let dvp_component = recent_average * factor;
    let blended = config.recent_weight * recent_average + config.dvp_weight * dvp_component;
    if !blended.is_finite() {
        tracing::warn!(recent_average, favorability, "projection overflowed, using recent average");
        return (0.0, recent_average, MatchupState::NoRating);
    }
    (dvp_component, blended.max(0.0), MatchupState::Applied)
}

/// Restrict the slate to watched players. An empty watchlist keeps everyone.
pub fn filter_watchlist<'a>(lineups: &'a [LineupEntry], watchlist: &[String]) -> Cow<'a, [LineupEntry]> {
    if watchlist.is_empty() {
        return Cow::Borrowed(lineups);
    }
    let watched: HashSet<String> = watchlist.iter().map(|name| player_key(name)).collect();
    let kept: Vec<LineupEntry> = lineups
        .iter()
        .filter(|l| watched.contains(&l.player))
        .cloned()
        .collect();
    tracing::info!(watched = watched.len(), kept = kept.len(), "applied watchlist");
    Cow::Owned(kept)
}

/// Project every recent-stat record whose player is on today's slate.
///
/// Ratings are matched on (opponent, position, stat). Records for players with
/// no lineup entry have no game today and are skipped.
pub fn project(
    recent: &[RecentStatRecord],
    ratings: &[DvpRating],
    lineups: &[LineupEntry],
    config: &ProjectionConfig,
) -> Vec<Projection> {
    let by_matchup: HashMap<(&str, Position, StatCategory), &DvpRating> = ratings
        .iter()
        .map(|r| ((r.team.as_str(), r.position, r.stat), r))
        .collect();
    let slate: HashMap<&str, &LineupEntry> =
        lineups.iter().map(|l| (l.player.as_str(), l)).collect();

    let mut off_slate = 0usize;
    let mut unmatched = 0usize;
    let mut projections = Vec::with_capacity(recent.len());

    for record in recent {
        let Some(entry) = slate.get(record.player.as_str()) else {
            off_slate += 1;
            continue;
        };

        let rating = by_matchup
            .get(&(entry.opponent.as_str(), entry.position, record.stat))
            .copied();
        if rating.is_none() {
            unmatched += 1;
            tracing::debug!(
                player = %record.player,
                opponent = %entry.opponent,
                position = %entry.position,
                stat = %record.stat,
                "no DVP rating for matchup, using recent average"
            );
        }

        let (dvp_component, blended, matchup) = blend(
            record.average,
            rating.map(|r| r.favorability),
            record.minutes_per_game,
            entry.position,
            config,
        );

        projections.push(Projection {
            player: record.player.clone(),
            display_name: entry.display_name.clone(),
            team: entry.team.clone(),
            opponent: entry.opponent.clone(),
            position: entry.position,
            stat: record.stat,
            games_played: record.games_played,
            minutes_per_game: record.minutes_per_game,
            recent_average: record.average,
            defense_rank: rating.map(|r| r.rank),
            favorability: rating.map(|r| r.favorability),
            dvp_component,
            matchup,
            blended,
        });
    }

    if unmatched > 0 {
        tracing::warn!(unmatched, "projections fell back to recent average");
    }
    tracing::info!(
        projected = projections.len(),
        off_slate,
        "projection pass complete"
    );
    projections
}
