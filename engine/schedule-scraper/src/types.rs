//! Parsed weekly schedule and the conservative fallback clock.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

/// One franchise's slate for a week. No kickoff means the team is on bye.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledGame {
    pub opponent: Option<String>,
    pub kickoff_utc: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekSchedule {
    pub week: u16,
    /// Keyed by franchise abbreviation.
    pub games: BTreeMap<String, ScheduledGame>,
}

impl WeekSchedule {
    pub fn game_started(&self, team: &str, now: DateTime<Utc>) -> bool {
        self.games
            .get(team)
            .and_then(|game| game.kickoff_utc)
            .map_or(false, |kickoff| now >= kickoff)
    }

    pub fn is_bye(&self, team: &str) -> bool {
        self.games.get(team).map_or(false, |game| game.kickoff_utc.is_none())
    }
}

/// Whether a week's games are certainly over without a schedule to consult.
/// Weeks kick off on Thursday and the last game ends Monday night, so the
/// following Tuesday 09:00 UTC is a safe bound.
pub fn week_concluded_fallback(season_start: DateTime<Utc>, week: u16, now: DateTime<Utc>) -> bool {
    let thursday = season_start + Duration::weeks(i64::from(week.saturating_sub(1)));
    now >= thursday + Duration::days(5) + Duration::hours(9)
}
