//! The persisted season snapshot.
//!
//! One JSON document holds everything a run produces: the resolved duos,
//! the per-week score table for both awards, the full substitution ledger,
//! and bookkeeping about the run that wrote it. Every run reads the
//! previous snapshot and writes a complete replacement.

use std::collections::BTreeMap;

use award_engine::{AwardType, ScoreTable, SubstitutionRecord, TeamName, TrackedPlayer, Week};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema version written by this build.
pub const SNAPSHOT_VERSION: &str = "3.0";

/// A complete season snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardSnapshot {
    /// Schema version of this document.
    pub version: String,

    /// When the writing run started.
    pub generated_at: DateTime<Utc>,

    /// Unique identifier for the writing run.
    pub run_id: Uuid,

    /// Week the writing run considered current.
    pub current_week: Week,

    /// Which award the published standings page is showing.
    pub current_award: String,

    /// Main-award duos with resolved platform ids.
    pub teams: Vec<SnapshotTeam>,

    /// Next-Up duos with resolved platform ids.
    pub next_up_teams: Vec<SnapshotTeam>,

    /// Main-award points, team -> week -> slot.
    pub scores: ScoreTable,

    /// Next-Up points, team -> week -> slot.
    pub next_up_scores: ScoreTable,

    /// The full substitution ledger.
    pub substitutions: Vec<SubstitutionRecord>,

    /// League the data was fetched from.
    pub sleeper_league_id: String,

    /// Checkpoint label of the writing run, e.g. "WEEKLY_REVIEW".
    pub last_checkpoint_type: String,

    /// Teams that left the league, with a note each.
    #[serde(default)]
    pub inactive_teams: BTreeMap<TeamName, String>,

    /// Mid-season manager handoffs, with a note each.
    #[serde(default)]
    pub manager_changes: BTreeMap<TeamName, String>,

    /// Counters summarizing what the writing run did.
    pub automation_stats: AutomationStats,
}

/// One fantasy team's tracked duo as resolved against the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTeam {
    /// Display name. Next-Up entries carry an award suffix.
    pub name: String,

    /// For Next-Up entries, the plain team name the entry belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_team_name: Option<TeamName>,

    /// The two tracked slots in declaration order.
    pub players: Vec<SnapshotPlayer>,

    /// Platform roster id, absent when the team has no roster anymore.
    #[serde(default)]
    pub sleeper_roster_id: Option<u32>,
}

/// A tracked slot with its platform id resolved at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPlayer {
    #[serde(flatten)]
    pub player: TrackedPlayer,

    /// Platform id, `None` when the player could not be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleeper_id: Option<String>,
}

/// Counters for the run that wrote the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationStats {
    /// Team score tables refreshed, both awards combined.
    pub scores_updated: usize,

    /// Substitution records created by this run.
    pub new_substitutions: usize,

    /// Ledger size after the run.
    pub total_substitutions: usize,

    /// Records dropped or repaired by ledger cleanup.
    pub cleaned_substitutions: usize,
}

impl AwardSnapshot {
    pub fn scores_for(&self, award: AwardType) -> &ScoreTable {
        match award {
            AwardType::Main => &self.scores,
            AwardType::NextUp => &self.next_up_scores,
        }
    }
}
