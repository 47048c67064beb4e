//! Week arithmetic anchored on the season's opening Thursday.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::SleeperLeague;

/// Derive the running week, preferring the platform's own indicator when it
/// is plausible. Weeks roll on Thursdays; the result is clamped to the
/// 18-week regular season.
pub fn current_week(
    league: Option<&SleeperLeague>,
    season_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> u16 {
    if let Some(leg) = league.and_then(|league| league.leg) {
        if (1..=18).contains(&leg) {
            debug!(leg, "using platform week indicator");
            return leg;
        }
    }

    let days = (now - season_start).num_days();
    let calculated = if days < 0 { 0 } else { days / 7 + 1 };
    calculated.clamp(1, 18) as u16
}
