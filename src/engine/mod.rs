pub mod edge;
pub mod kelly;
pub mod normalize;
pub mod odds;
pub mod projection;
pub mod ranker;
pub mod scorer;
pub mod types;

use crate::config::Config;
use crate::error::{ConfigError, EdgeError};
use types::{DvpRating, EdgeResult, LineupEntry, ProjectedPlay, RecentStatRecord};

/// Scoring engine bound to a validated configuration.
///
/// Stateless across runs: every call is a pure function of its arguments and
/// the borrowed config, so one `Engine` can serve any number of dates.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    config: &'a Config,
}

impl<'a> Engine<'a> {
    /// Validates before anything is computed.
    pub fn new(config: &'a Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Project, score, filter, and rank. Returns the top plays per category.
    ///
    /// Lineups outside a non-empty `engine.watchlist` are dropped before the
    /// join.
    pub fn compute_projections(
        &self,
        ratings: &[DvpRating],
        recent: &[RecentStatRecord],
        lineups: &[LineupEntry],
    ) -> Vec<ProjectedPlay> {
        let engine = &self.config.engine;
        let lineups = projection::filter_watchlist(lineups, &engine.watchlist);
        let projections = projection::project(recent, ratings, &lineups, &self.config.projection);
        let candidates = scorer::score_candidates(projections, engine, &self.config.scoring);
        ranker::rank_plays(
            candidates,
            engine.top_plays_per_category,
            engine.max_plays_per_player,
        )
    }

    pub fn compute_edge(&self, play: &ProjectedPlay, line: f64) -> Result<EdgeResult, EdgeError> {
        edge::compute_edge(play, line, &self.config.edge)
    }

    pub fn compute_edge_for_projection(
        &self,
        projection: f64,
        line: f64,
    ) -> Result<EdgeResult, EdgeError> {
        edge::compute_edge_for_projection(projection, line, &self.config.edge)
    }
}
