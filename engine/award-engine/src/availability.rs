//! Availability classification: is a player locked, and if not, why are
//! they unavailable?
//!
//! The lock flag has absolute precedence. A player who has scored points or
//! whose game has kicked off is frozen for the week no matter what the
//! injury report says, which keeps late designation flips from retroactively
//! swapping a player who already took the field.

use tracing::warn;

use crate::league::LeagueView;
use crate::types::{Availability, AvailabilityStatus, Week};

/// Schedule facts the classifier needs. Implemented by the service layer
/// over scraped kickoff times plus the configured bye table; tests provide
/// fixed fakes.
pub trait ScheduleProvider {
    /// Whether the team's game for the week has kicked off. Teams on bye
    /// have no game and must report `false`.
    fn game_started(&self, team: &str, week: Week) -> bool;

    /// Whether the team is on bye for the week.
    fn on_bye(&self, team: &str, week: Week) -> bool;
}

/// Maps a platform injury designation onto an availability status.
/// Reserve lists mean the season is effectively over for the player;
/// questionable is tracked but never triggers a substitution.
pub fn status_from_injury_flag(flag: Option<&str>) -> AvailabilityStatus {
    let Some(flag) = flag else {
        return AvailabilityStatus::Healthy;
    };
    match flag.trim().to_ascii_lowercase().as_str() {
        "out" => AvailabilityStatus::Out,
        "doubtful" => AvailabilityStatus::Doubtful,
        "ir" | "pup" => AvailabilityStatus::SeasonEnding,
        "questionable" => AvailabilityStatus::Questionable,
        _ => AvailabilityStatus::Healthy,
    }
}

/// Stateless classifier over one run's league view and schedule.
pub struct AvailabilityClassifier<'a> {
    league: &'a LeagueView,
    schedule: &'a dyn ScheduleProvider,
}

impl<'a> AvailabilityClassifier<'a> {
    pub fn new(league: &'a LeagueView, schedule: &'a dyn ScheduleProvider) -> Self {
        AvailabilityClassifier { league, schedule }
    }

    /// Classify one player for one week.
    ///
    /// Unknown player ids classify as unlocked and healthy so a stale id in
    /// the directory degrades to "no action" rather than a spurious swap.
    pub fn classify(&self, player_id: &str, week: Week) -> Availability {
        let Some(player) = self.league.player(player_id) else {
            warn!(player_id, "player missing from directory, treating as healthy");
            return Availability {
                locked: false,
                status: AvailabilityStatus::Healthy,
            };
        };

        let scored = self
            .league
            .scores
            .points(player_id, week)
            .map_or(false, |points| points > 0.0);
        let team = player.team.as_deref();
        let started = team.map_or(false, |t| self.schedule.game_started(t, week));
        let locked = scored || started;

        let status = if team.map_or(false, |t| self.schedule.on_bye(t, week)) {
            AvailabilityStatus::Bye
        } else {
            status_from_injury_flag(player.injury_status.as_deref())
        };

        Availability { locked, status }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::league::ScoreBook;
    use crate::types::{PlatformPlayer, Position};

    #[derive(Default)]
    struct FakeSchedule {
        started: BTreeSet<(String, Week)>,
        byes: BTreeSet<(String, Week)>,
    }

    impl FakeSchedule {
        fn with_started(mut self, team: &str, week: Week) -> Self {
            self.started.insert((team.to_string(), week));
            self
        }

        fn with_bye(mut self, team: &str, week: Week) -> Self {
            self.byes.insert((team.to_string(), week));
            self
        }
    }

    impl ScheduleProvider for FakeSchedule {
        fn game_started(&self, team: &str, week: Week) -> bool {
            self.started.contains(&(team.to_string(), week))
        }

        fn on_bye(&self, team: &str, week: Week) -> bool {
            self.byes.contains(&(team.to_string(), week))
        }
    }

    fn league_with(player: PlatformPlayer, points: Option<(Week, f64)>) -> LeagueView {
        let mut league = LeagueView::default();
        let mut scores = ScoreBook::new();
        if let Some((week, pts)) = points {
            scores.insert_week(week, BTreeMap::from([(player.id.clone(), pts)]));
        }
        league.players.insert(player.id.clone(), player);
        league.scores = scores;
        league
    }

    fn sample_player(injury: Option<&str>) -> PlatformPlayer {
        PlatformPlayer {
            id: "77".to_string(),
            first_name: "Test".to_string(),
            last_name: "Player".to_string(),
            position: Some(Position::RB),
            team: Some("KC".to_string()),
            years_exp: Some(2),
            injury_status: injury.map(str::to_string),
        }
    }

    #[test]
    fn nonzero_score_locks_even_when_out() {
        let league = league_with(sample_player(Some("Out")), Some((5, 3.2)));
        let schedule = FakeSchedule::default();
        let classifier = AvailabilityClassifier::new(&league, &schedule);
        let avail = classifier.classify("77", 5);
        assert!(avail.locked);
        assert_eq!(avail.status, AvailabilityStatus::Out);
        assert!(!avail.substitutable());
    }

    #[test]
    fn zero_score_does_not_lock() {
        let league = league_with(sample_player(Some("Out")), Some((5, 0.0)));
        let schedule = FakeSchedule::default();
        let classifier = AvailabilityClassifier::new(&league, &schedule);
        let avail = classifier.classify("77", 5);
        assert!(!avail.locked);
        assert!(avail.substitutable());
    }

    #[test]
    fn kickoff_locks_without_points() {
        let league = league_with(sample_player(None), None);
        let schedule = FakeSchedule::default().with_started("KC", 5);
        let classifier = AvailabilityClassifier::new(&league, &schedule);
        assert!(classifier.classify("77", 5).locked);
        assert!(!classifier.classify("77", 6).locked);
    }

    #[test]
    fn bye_week_takes_status_precedence() {
        let league = league_with(sample_player(Some("Questionable")), None);
        let schedule = FakeSchedule::default().with_bye("KC", 7);
        let classifier = AvailabilityClassifier::new(&league, &schedule);
        let avail = classifier.classify("77", 7);
        assert_eq!(avail.status, AvailabilityStatus::Bye);
        assert!(avail.substitutable());
    }

    #[test]
    fn reserve_lists_map_to_season_ending() {
        for flag in ["IR", "PUP", "ir"] {
            assert_eq!(
                status_from_injury_flag(Some(flag)),
                AvailabilityStatus::SeasonEnding
            );
        }
        assert_eq!(status_from_injury_flag(Some("Sus")), AvailabilityStatus::Healthy);
        assert_eq!(status_from_injury_flag(None), AvailabilityStatus::Healthy);
    }

    #[test]
    fn unknown_player_classifies_healthy() {
        let league = LeagueView::default();
        let schedule = FakeSchedule::default();
        let classifier = AvailabilityClassifier::new(&league, &schedule);
        let avail = classifier.classify("nobody", 1);
        assert!(!avail.locked);
        assert_eq!(avail.status, AvailabilityStatus::Healthy);
    }
}
