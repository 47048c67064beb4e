//! Detection pass: which tracked slots are unavailable and unlocked this
//! week.
//!
//! Pure observation. The detector reports every slot that could justify a
//! substitution; whether one is actually created is the ledger manager's
//! call, which also knows about records already in effect.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::availability::AvailabilityClassifier;
use crate::config::SeasonConfig;
use crate::league::LeagueView;
use crate::lookup::{resolve_player, GlobalSearch};
use crate::types::{AvailabilityStatus, AwardType, PlayerId, TeamName, TrackedPlayer, Week};

/// One tracked slot found unavailable and not locked.
#[derive(Debug, Clone, PartialEq)]
pub struct UnavailableSlot {
    pub slot_index: usize,
    pub tracked: TrackedPlayer,
    pub player_id: PlayerId,
    pub status: AvailabilityStatus,
}

/// Unavailable slots grouped by award, then team.
pub type DetectionReport = BTreeMap<AwardType, BTreeMap<TeamName, Vec<UnavailableSlot>>>;

/// Scan every tracked duo and report slots needing a substitute this week.
///
/// Slots are skipped, not errored, when the team has no roster or the name
/// cannot be resolved; a data gap must never halt the remaining teams.
pub fn detect_unavailable(
    config: &SeasonConfig,
    league: &LeagueView,
    classifier: &AvailabilityClassifier<'_>,
    week: Week,
) -> DetectionReport {
    let mut report = DetectionReport::new();

    for award in AwardType::ALL {
        let Some(duos) = config.duos_for(award) else {
            continue;
        };
        for (team, duo) in duos {
            let Some(roster) = league.roster(team) else {
                debug!(team = %team, award = %award, "no roster for team, skipping detection");
                continue;
            };

            let mut found = Vec::new();
            for (slot_index, tracked) in duo.iter().enumerate() {
                let Some(player_id) = resolve_player(
                    tracked,
                    &roster.players,
                    &league.players,
                    GlobalSearch::RosterOnly,
                ) else {
                    warn!(
                        team = %team,
                        award = %award,
                        player = %tracked.name,
                        "tracked player not found on roster"
                    );
                    continue;
                };

                let availability = classifier.classify(&player_id, week);
                if availability.locked {
                    debug!(
                        team = %team,
                        award = %award,
                        player = %tracked.name,
                        status = %availability.status,
                        "player locked for the week, leaving alone"
                    );
                    continue;
                }
                if !availability.status.needs_substitute() {
                    continue;
                }

                debug!(
                    team = %team,
                    award = %award,
                    player = %tracked.name,
                    status = %availability.status,
                    "tracked player unavailable"
                );
                found.push(UnavailableSlot {
                    slot_index,
                    tracked: tracked.clone(),
                    player_id,
                    status: availability.status,
                });
            }

            if !found.is_empty() {
                report.entry(award).or_default().insert(team.clone(), found);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::availability::ScheduleProvider;
    use crate::league::{ScoreBook, TeamRoster};
    use crate::types::{PlatformPlayer, Position};

    #[derive(Default)]
    struct FakeSchedule {
        byes: BTreeSet<(String, Week)>,
    }

    impl ScheduleProvider for FakeSchedule {
        fn game_started(&self, _team: &str, _week: Week) -> bool {
            false
        }

        fn on_bye(&self, team: &str, week: Week) -> bool {
            self.byes.contains(&(team.to_string(), week))
        }
    }

    fn player(
        id: &str,
        first: &str,
        last: &str,
        position: Position,
        injury: Option<&str>,
    ) -> PlatformPlayer {
        PlatformPlayer {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            position: Some(position),
            team: Some("KC".to_string()),
            years_exp: Some(3),
            injury_status: injury.map(str::to_string),
        }
    }

    fn config_with_main_duo() -> SeasonConfig {
        let json = r#"{
            "season": "2025",
            "seasonStart": "2025-09-04T00:00:00Z",
            "duos": {
                "main": {
                    "Team Alpha": [
                        { "name": "Quart Back", "position": "QB" },
                        { "name": "Run Ner", "position": "RB" }
                    ]
                }
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    fn league(players: Vec<PlatformPlayer>, scores: ScoreBook) -> LeagueView {
        let mut view = LeagueView::default();
        view.rosters.insert(
            "Team Alpha".to_string(),
            TeamRoster {
                roster_id: 1,
                players: players.iter().map(|p| p.id.clone()).collect(),
            },
        );
        for p in players {
            view.players.insert(p.id.clone(), p);
        }
        view.scores = scores;
        view
    }

    #[test]
    fn reports_out_players_and_skips_healthy() {
        let view = league(
            vec![
                player("1", "Quart", "Back", Position::QB, Some("Out")),
                player("2", "Run", "Ner", Position::RB, None),
            ],
            ScoreBook::new(),
        );
        let schedule = FakeSchedule::default();
        let classifier = AvailabilityClassifier::new(&view, &schedule);
        let report = detect_unavailable(&config_with_main_duo(), &view, &classifier, 5);

        let slots = &report[&AwardType::Main]["Team Alpha"];
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot_index, 0);
        assert_eq!(slots[0].player_id, "1");
        assert_eq!(slots[0].status, AvailabilityStatus::Out);
    }

    #[test]
    fn locked_players_are_never_reported() {
        let mut scores = ScoreBook::new();
        scores.insert_week(5, std::collections::BTreeMap::from([("1".to_string(), 11.4)]));
        let view = league(
            vec![
                player("1", "Quart", "Back", Position::QB, Some("Out")),
                player("2", "Run", "Ner", Position::RB, None),
            ],
            scores,
        );
        let schedule = FakeSchedule::default();
        let classifier = AvailabilityClassifier::new(&view, &schedule);
        let report = detect_unavailable(&config_with_main_duo(), &view, &classifier, 5);
        assert!(report.is_empty());
    }

    #[test]
    fn questionable_players_are_not_reported() {
        let view = league(
            vec![
                player("1", "Quart", "Back", Position::QB, Some("Questionable")),
                player("2", "Run", "Ner", Position::RB, None),
            ],
            ScoreBook::new(),
        );
        let schedule = FakeSchedule::default();
        let classifier = AvailabilityClassifier::new(&view, &schedule);
        let report = detect_unavailable(&config_with_main_duo(), &view, &classifier, 5);
        assert!(report.is_empty());
    }

    #[test]
    fn bye_weeks_are_reported() {
        let view = league(
            vec![
                player("1", "Quart", "Back", Position::QB, None),
                player("2", "Run", "Ner", Position::RB, None),
            ],
            ScoreBook::new(),
        );
        let mut schedule = FakeSchedule::default();
        schedule.byes.insert(("KC".to_string(), 10));
        let classifier = AvailabilityClassifier::new(&view, &schedule);
        let report = detect_unavailable(&config_with_main_duo(), &view, &classifier, 10);
        let slots = &report[&AwardType::Main]["Team Alpha"];
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.status == AvailabilityStatus::Bye));
    }

    #[test]
    fn missing_roster_degrades_to_no_report() {
        let mut view = league(Vec::new(), ScoreBook::new());
        view.rosters.clear();
        let schedule = FakeSchedule::default();
        let classifier = AvailabilityClassifier::new(&view, &schedule);
        let report = detect_unavailable(&config_with_main_duo(), &view, &classifier, 5);
        assert!(report.is_empty());
    }

    #[test]
    fn unresolvable_name_is_skipped() {
        let view = league(
            vec![player("2", "Run", "Ner", Position::RB, Some("Out"))],
            ScoreBook::new(),
        );
        let schedule = FakeSchedule::default();
        let classifier = AvailabilityClassifier::new(&view, &schedule);
        let report = detect_unavailable(&config_with_main_duo(), &view, &classifier, 5);
        let slots = &report[&AwardType::Main]["Team Alpha"];
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot_index, 1);
    }
}
