//! Score resolution for the weekly tables the snapshot carries.
//!
//! For every slot and week the in-effect ledger record wins, with a
//! sentinel scoring zero; otherwise the tracked original is looked up
//! across the whole directory so traded-away players keep their points.
//! Bye weeks score zero no matter what the platform reported.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::availability::ScheduleProvider;
use crate::config::SeasonConfig;
use crate::league::LeagueView;
use crate::ledger::SubstitutionLedger;
use crate::lookup::{resolve_player, GlobalSearch};
use crate::types::{
    AwardType, ExperienceTier, PlayerId, TeamName, TrackedPlayer, Week, FIRST_WEEK,
};

/// Week → points for the two slots, in declaration order.
pub type TeamScoreRows = BTreeMap<Week, [f64; 2]>;
/// One award's table keyed by fantasy team.
pub type ScoreTable = BTreeMap<TeamName, TeamScoreRows>;
/// Both awards' tables.
pub type ScoreReport = BTreeMap<AwardType, ScoreTable>;

struct ResolvedSlot {
    player_id: Option<PlayerId>,
    /// A non-sentinel substitution record supplied the player.
    substituted: bool,
}

pub struct ScoreResolver<'a> {
    config: &'a SeasonConfig,
    league: &'a LeagueView,
    schedule: &'a dyn ScheduleProvider,
    ledger: &'a SubstitutionLedger,
    current_week: Week,
}

impl<'a> ScoreResolver<'a> {
    pub fn new(
        config: &'a SeasonConfig,
        league: &'a LeagueView,
        schedule: &'a dyn ScheduleProvider,
        ledger: &'a SubstitutionLedger,
        current_week: Week,
    ) -> Self {
        ScoreResolver {
            config,
            league,
            schedule,
            ledger,
            current_week,
        }
    }

    /// Build the score table for every configured duo through the current
    /// week. `previous` is the table from the last persisted snapshot;
    /// teams marked inactive or missing a roster replay their rows from it
    /// unchanged.
    pub fn resolve(&self, previous: Option<&ScoreReport>) -> ScoreReport {
        let mut report = ScoreReport::new();
        for award in AwardType::ALL {
            let mut table = ScoreTable::new();
            if let Some(duos) = self.config.duos_for(award) {
                for (team, duo) in duos {
                    table.insert(team.clone(), self.rows_for(award, team, duo, previous));
                }
            }
            report.insert(award, table);
        }
        self.apply_corrections(&mut report);
        report
    }

    fn rows_for(
        &self,
        award: AwardType,
        team: &str,
        duo: &[TrackedPlayer; 2],
        previous: Option<&ScoreReport>,
    ) -> TeamScoreRows {
        let roster = if self.config.inactive_teams.contains_key(team) {
            None
        } else {
            self.league.roster(team)
        };
        let Some(roster) = roster else {
            let rows = previous
                .and_then(|report| report.get(&award))
                .and_then(|table| table.get(team))
                .cloned()
                .unwrap_or_default();
            debug!(
                team = %team,
                award = %award,
                weeks = rows.len(),
                "no live roster, replaying stored scores"
            );
            return rows;
        };

        let mut rows = TeamScoreRows::new();
        for week in FIRST_WEEK..=self.current_week {
            let resolved = [
                self.resolve_slot(award, team, duo, 0, week, &roster.players),
                self.resolve_slot(award, team, duo, 1, week, &roster.players),
            ];
            let mut points = [
                self.slot_points(&resolved[0], week),
                self.slot_points(&resolved[1], week),
            ];
            if award == AwardType::NextUp {
                self.enforce_tier_split(team, duo, week, &resolved, &mut points);
            }
            rows.insert(week, points);
        }
        rows
    }

    fn resolve_slot(
        &self,
        award: AwardType,
        team: &str,
        duo: &[TrackedPlayer; 2],
        slot_index: usize,
        week: Week,
        roster_players: &[PlayerId],
    ) -> ResolvedSlot {
        if let Some(record) = self.ledger.record_in_effect(team, award, slot_index, week) {
            if record.is_sentinel() {
                return ResolvedSlot {
                    player_id: None,
                    substituted: false,
                };
            }
            return ResolvedSlot {
                player_id: record.substitute_player_id.clone(),
                substituted: true,
            };
        }

        // Traded-away originals keep scoring, so the search is global.
        let player_id = resolve_player(
            &duo[slot_index],
            roster_players,
            &self.league.players,
            GlobalSearch::Allowed,
        );
        if player_id.is_none() {
            debug!(
                team = %team,
                award = %award,
                player = %duo[slot_index].name,
                week,
                "tracked player not found anywhere, slot scores zero"
            );
        }
        ResolvedSlot {
            player_id,
            substituted: false,
        }
    }

    fn slot_points(&self, slot: &ResolvedSlot, week: Week) -> f64 {
        let Some(player_id) = &slot.player_id else {
            return 0.0;
        };
        let reported = self.league.scores.points(player_id, week).unwrap_or(0.0);
        let nfl_team = self
            .league
            .player(player_id)
            .and_then(|player| player.team.as_deref());
        if let Some(nfl_team) = nfl_team {
            if self.schedule.on_bye(nfl_team, week) {
                if reported != 0.0 {
                    warn!(
                        player = %player_id,
                        week,
                        reported,
                        "nonzero score reported on a bye week, zeroing"
                    );
                }
                return 0.0;
            }
        }
        reported
    }

    /// Hand-edited records can break the rookie/sophomore split. When both
    /// resolved slots land on one tier, the substituted side loses its
    /// points and the original keeps scoring.
    fn enforce_tier_split(
        &self,
        team: &str,
        duo: &[TrackedPlayer; 2],
        week: Week,
        resolved: &[ResolvedSlot; 2],
        points: &mut [f64; 2],
    ) {
        if !resolved.iter().any(|slot| slot.substituted) {
            return;
        }
        let tiers = [
            self.resolved_tier(duo, 0, &resolved[0]),
            self.resolved_tier(duo, 1, &resolved[1]),
        ];
        let (Some(first), Some(second)) = (tiers[0], tiers[1]) else {
            return;
        };
        if first != second {
            return;
        }
        warn!(
            team = %team,
            week,
            tier = %first,
            "next-up pair resolved onto one tier, zeroing substituted slots"
        );
        for (index, slot) in resolved.iter().enumerate() {
            if slot.substituted {
                points[index] = 0.0;
            }
        }
    }

    fn resolved_tier(
        &self,
        duo: &[TrackedPlayer; 2],
        slot_index: usize,
        slot: &ResolvedSlot,
    ) -> Option<ExperienceTier> {
        let from_directory = slot
            .player_id
            .as_deref()
            .and_then(|id| self.league.player(id))
            .and_then(|player| player.experience_tier());
        if slot.substituted {
            from_directory
        } else {
            from_directory.or(duo[slot_index].experience)
        }
    }

    fn apply_corrections(&self, report: &mut ScoreReport) {
        for correction in &self.config.score_corrections {
            if correction.week > self.current_week {
                debug!(
                    team = %correction.team_name,
                    week = correction.week,
                    "score correction is beyond the current week, skipping"
                );
                continue;
            }
            let Some(rows) = report
                .get_mut(&correction.award_type)
                .and_then(|table| table.get_mut(&correction.team_name))
            else {
                warn!(
                    team = %correction.team_name,
                    award = %correction.award_type,
                    "score correction names a team with no score rows"
                );
                continue;
            };
            let row = rows.entry(correction.week).or_insert([0.0, 0.0]);
            let Some(cell) = row.get_mut(correction.slot_index) else {
                continue;
            };
            *cell = correction.points;
            info!(
                team = %correction.team_name,
                award = %correction.award_type,
                week = correction.week,
                slot = correction.slot_index,
                points = correction.points,
                "applied score correction"
            );
        }
    }
}
