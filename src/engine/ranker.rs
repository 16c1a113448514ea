use super::scorer::{compare_candidates, ScoredCandidate};
use super::types::{ProjectedPlay, StatCategory};
use std::collections::{BTreeMap, HashMap};

/// Keep the top `top_n` candidates per stat category and assign dense 1-based
/// ranks.
///
/// Candidates are taken best-first across the whole slate, so when
/// `max_per_player` is non-zero a player's weaker categories are the ones
/// dropped once the cap is reached. Skipped candidates never consume a rank.
///
/// Output is grouped by category (enum order) and ranked within each group.
/// Identical input always yields identical output regardless of input order.
pub fn rank_plays(
    mut candidates: Vec<ScoredCandidate>,
    top_n: usize,
    max_per_player: usize,
) -> Vec<ProjectedPlay> {
    candidates.sort_by(|a, b| {
        compare_candidates(a, b).then_with(|| a.projection.stat.cmp(&b.projection.stat))
    });

    let mut partitions: BTreeMap<StatCategory, Vec<ScoredCandidate>> = BTreeMap::new();
    let mut per_player: HashMap<String, usize> = HashMap::new();
    let mut capped = 0usize;

    for candidate in candidates {
        let group = partitions.entry(candidate.projection.stat).or_default();
        if group.len() >= top_n {
            continue;
        }
        let held = per_player.entry(candidate.projection.player.clone()).or_default();
        if max_per_player > 0 && *held >= max_per_player {
            capped += 1;
            continue;
        }
        *held += 1;
        group.push(candidate);
    }
    if capped > 0 {
        tracing::debug!(capped, max_per_player, "dropped plays over the per-player cap");
    }

    let mut plays = Vec::new();
    for (stat, group) in partitions {
        tracing::debug!(%stat, kept = group.len(), "ranked category");
        plays.extend(
            group
                .into_iter()
                .enumerate()
                .map(|(i, candidate)| into_play(candidate, i + 1)),
        );
    }
    plays
}

fn into_play(candidate: ScoredCandidate, rank: usize) -> ProjectedPlay {
    let p = candidate.projection;
    ProjectedPlay {
        player: p.player,
        display_name: p.display_name,
        team: p.team,
        opponent: p.opponent,
        position: p.position,
        stat: p.stat,
        games_played: p.games_played,
        minutes_per_game: p.minutes_per_game,
        recent_component: p.recent_average,
        dvp_component: p.dvp_component,
        defense_rank: p.defense_rank,
        favorability: p.favorability,
        matchup: p.matchup,
        blended_projection: p.blended,
        score: candidate.score,
        rank,
    }
}

/// Look up a ranked play by category and 1-based rank.
pub fn find_play(plays: &[ProjectedPlay], stat: StatCategory, rank: usize) -> Option<&ProjectedPlay> {
    plays.iter().find(|p| p.stat == stat && p.rank == rank)
}
