//! Immutable view of league state for one engine run.
//!
//! The fetchers assemble a `LeagueView` once per invocation; every pass in
//! the engine reads from it and nothing mutates it. Map-backed storage keeps
//! iteration order stable so repeated runs over the same data make the same
//! decisions.

use std::collections::BTreeMap;

use crate::types::{PlayerId, PlatformPlayer, TeamName, Week};

/// One fantasy roster keyed by the owner's display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRoster {
    pub roster_id: u32,
    /// Player ids in platform roster order.
    pub players: Vec<PlayerId>,
}

impl TeamRoster {
    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|id| id == player_id)
    }
}

/// Per-week fantasy points keyed by player id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBook {
    weeks: BTreeMap<Week, BTreeMap<PlayerId, f64>>,
}

impl ScoreBook {
    pub fn new() -> ScoreBook {
        ScoreBook::default()
    }

    pub fn insert_week(&mut self, week: Week, scores: BTreeMap<PlayerId, f64>) {
        self.weeks.insert(week, scores);
    }

    pub fn has_week(&self, week: Week) -> bool {
        self.weeks.contains_key(&week)
    }

    /// Points a player scored in a week, if the platform reported any.
    pub fn points(&self, player_id: &str, week: Week) -> Option<f64> {
        self.weeks.get(&week).and_then(|w| w.get(player_id)).copied()
    }

    /// Sum of points over the trailing three-week window ending at `week`
    /// (fewer weeks early in the season). Missing weeks count as zero.
    pub fn trailing_total(&self, player_id: &str, week: Week) -> f64 {
        let start = week.saturating_sub(2).max(1);
        (start..=week)
            .map(|w| self.points(player_id, w).unwrap_or(0.0))
            .sum()
    }
}

/// Everything the engine knows about the league for one run.
#[derive(Debug, Clone, Default)]
pub struct LeagueView {
    /// Fantasy rosters keyed by owner display name.
    pub rosters: BTreeMap<TeamName, TeamRoster>,
    /// Player directory keyed by platform id.
    pub players: BTreeMap<PlayerId, PlatformPlayer>,
    pub scores: ScoreBook,
}

impl LeagueView {
    pub fn roster(&self, team: &str) -> Option<&TeamRoster> {
        self.rosters.get(team)
    }

    pub fn player(&self, player_id: &str) -> Option<&PlatformPlayer> {
        self.players.get(player_id)
    }
}
