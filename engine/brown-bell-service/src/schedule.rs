//! Live schedule adapter feeding the availability classifier.
//!
//! Byes come from the season config for every week. Kickoff facts come
//! from the scraped page for the current week; when the scrape failed the
//! Tuesday-morning fallback stands in, which locks the whole week once it
//! has concluded and never locks a game early.

use award_engine::{ScheduleProvider, Week};
use chrono::{DateTime, Utc};
use schedule_scraper::{week_concluded_fallback, WeekSchedule};
use std::collections::BTreeMap;

pub struct LiveSchedule {
    byes: BTreeMap<String, Week>,
    scraped: Option<WeekSchedule>,
    current_week: Week,
    season_start: DateTime<Utc>,
    now: DateTime<Utc>,
}

impl LiveSchedule {
    pub fn new(
        byes: BTreeMap<String, Week>,
        scraped: Option<WeekSchedule>,
        current_week: Week,
        season_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LiveSchedule {
        LiveSchedule {
            byes,
            scraped,
            current_week,
            season_start,
            now,
        }
    }
}

impl ScheduleProvider for LiveSchedule {
    fn game_started(&self, team: &str, week: Week) -> bool {
        if self.on_bye(team, week) {
            return false;
        }
        if week < self.current_week {
            return true;
        }
        if week > self.current_week {
            return false;
        }
        match &self.scraped {
            Some(schedule) if schedule.week == week => schedule.game_started(team, self.now),
            _ => week_concluded_fallback(self.season_start, week, self.now),
        }
    }

    fn on_bye(&self, team: &str, week: Week) -> bool {
        self.byes.get(team) == Some(&week)
    }
}
