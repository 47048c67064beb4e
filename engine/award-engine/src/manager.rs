//! Ledger maintenance passes: cleanup, active-substitute recheck, and the
//! new-injury sweep.
//!
//! Pass order matters. Cleanup first so every later decision sees a sane
//! ledger, then flagged substitutes are dealt with, then fresh injuries.
//! Records created by an earlier pass are visible to later ones, which is
//! how double-filling a slot within one run is prevented.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::availability::AvailabilityClassifier;
use crate::config::SeasonConfig;
use crate::detector::{detect_unavailable, UnavailableSlot};
use crate::league::LeagueView;
use crate::ledger::{SubstitutionLedger, SubstitutionRecord};
use crate::lookup::{resolve_player, GlobalSearch};
use crate::selector::{PairingPartner, SubstituteCandidate, SubstituteSelector};
use crate::types::{AvailabilityStatus, AwardType, PlayerId, TrackedPlayer, Week};

/// Which maintenance passes a run performs. Routine score refreshes skip
/// the ledger entirely; every active checkpoint runs all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPasses {
    pub cleanup: bool,
    pub recheck_active: bool,
    pub new_injuries: bool,
}

impl LedgerPasses {
    pub fn full() -> LedgerPasses {
        LedgerPasses {
            cleanup: true,
            recheck_active: true,
            new_injuries: true,
        }
    }

    pub fn none() -> LedgerPasses {
        LedgerPasses {
            cleanup: false,
            recheck_active: false,
            new_injuries: false,
        }
    }

    pub fn any(&self) -> bool {
        self.cleanup || self.recheck_active || self.new_injuries
    }
}

/// What one run of the manager did to the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    /// Records dropped by cleanup.
    pub cleaned: usize,
    /// Active substitutes found unavailable.
    pub flagged_substitutes: usize,
    /// Originals found recovered while their substitute was flagged.
    pub recovered_originals: usize,
    /// Replacement records opened for failed substitutes.
    pub forced_replacements: usize,
    /// Records opened by the new-injury pass.
    pub new_substitutions: usize,
    /// No-eligible-substitute sentinels emitted.
    pub sentinels: usize,
}

impl LedgerStats {
    /// Substitution records opened this run, sentinels not included.
    pub fn records_created(&self) -> usize {
        self.forced_replacements + self.new_substitutions
    }
}

#[derive(Debug)]
struct FlaggedSubstitute {
    index: usize,
    cause: FlagCause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagCause {
    Dropped,
    Status(AvailabilityStatus),
}

impl FlagCause {
    fn describe(&self) -> String {
        match self {
            FlagCause::Dropped => "dropped from roster".to_string(),
            FlagCause::Status(AvailabilityStatus::Bye) => "on bye".to_string(),
            FlagCause::Status(status) => status.to_string(),
        }
    }
}

pub struct LedgerManager<'a> {
    config: &'a SeasonConfig,
    league: &'a LeagueView,
    classifier: &'a AvailabilityClassifier<'a>,
    selector: &'a SubstituteSelector<'a>,
    week: Week,
    /// Prefix for record reasons, names the checkpoint that ran.
    reason_label: &'a str,
}

impl<'a> LedgerManager<'a> {
    pub fn new(
        config: &'a SeasonConfig,
        league: &'a LeagueView,
        classifier: &'a AvailabilityClassifier<'a>,
        selector: &'a SubstituteSelector<'a>,
        week: Week,
        reason_label: &'a str,
    ) -> Self {
        LedgerManager {
            config,
            league,
            classifier,
            selector,
            week,
            reason_label,
        }
    }

    pub fn run<R: Rng + ?Sized>(
        &self,
        ledger: &mut SubstitutionLedger,
        passes: LedgerPasses,
        rng: &mut R,
    ) -> LedgerStats {
        let mut stats = LedgerStats::default();
        if !passes.any() {
            debug!(week = self.week, "no ledger passes requested");
            return stats;
        }

        if passes.cleanup {
            stats.cleaned = ledger.cleanup(self.week);
        }
        if passes.recheck_active {
            self.recheck_active_substitutes(ledger, &mut stats, rng);
        }
        if passes.new_injuries {
            self.new_injury_pass(ledger, &mut stats, rng);
        }

        info!(
            week = self.week,
            cleaned = stats.cleaned,
            flagged = stats.flagged_substitutes,
            recovered = stats.recovered_originals,
            forced = stats.forced_replacements,
            new = stats.new_substitutions,
            sentinels = stats.sentinels,
            "ledger passes complete"
        );
        stats
    }

    /// Re-classify every in-effect substitute and replace the ones that can
    /// no longer play.
    fn recheck_active_substitutes<R: Rng + ?Sized>(
        &self,
        ledger: &mut SubstitutionLedger,
        stats: &mut LedgerStats,
        rng: &mut R,
    ) {
        let flagged = self.flag_substitutes(ledger);
        stats.flagged_substitutes = flagged.len();
        for flag in flagged {
            self.force_replace(ledger, flag, stats, rng);
        }
    }

    fn flag_substitutes(&self, ledger: &SubstitutionLedger) -> Vec<FlaggedSubstitute> {
        let mut flagged = Vec::new();
        for (index, record) in ledger.records().iter().enumerate() {
            if !record.active || !record.auto_generated || !record.in_effect(self.week) {
                continue;
            }
            if record.slot_index > 1 {
                warn!(
                    team = %record.team_name,
                    award = %record.award_type,
                    slot = record.slot_index,
                    "record names a slot outside 0..=1, skipping recheck"
                );
                continue;
            }
            let Some(substitute_id) = &record.substitute_player_id else {
                continue;
            };
            let Some(roster) = self.league.roster(&record.team_name) else {
                debug!(team = %record.team_name, "no roster while rechecking substitutes");
                continue;
            };

            if !roster.contains(substitute_id) {
                warn!(
                    team = %record.team_name,
                    award = %record.award_type,
                    substitute = record.substitute_name.as_deref().unwrap_or(substitute_id),
                    "active substitute dropped from roster"
                );
                flagged.push(FlaggedSubstitute {
                    index,
                    cause: FlagCause::Dropped,
                });
                continue;
            }

            let availability = self.classifier.classify(substitute_id, self.week);
            if availability.locked {
                continue;
            }
            if availability.status.needs_substitute() {
                warn!(
                    team = %record.team_name,
                    award = %record.award_type,
                    substitute = record.substitute_name.as_deref().unwrap_or(substitute_id),
                    status = %availability.status,
                    "active substitute unavailable"
                );
                flagged.push(FlaggedSubstitute {
                    index,
                    cause: FlagCause::Status(availability.status),
                });
            }
        }
        flagged
    }

    /// Deal with one flagged substitute: hand the slot back to a recovered
    /// original, overlay a one-week stopgap for a substitute on bye, or
    /// close the record and pick again.
    fn force_replace<R: Rng + ?Sized>(
        &self,
        ledger: &mut SubstitutionLedger,
        flag: FlaggedSubstitute,
        stats: &mut LedgerStats,
        rng: &mut R,
    ) {
        let record = ledger.records()[flag.index].clone();
        let Some(duo) = self.config.duo(record.award_type, &record.team_name) else {
            warn!(
                team = %record.team_name,
                award = %record.award_type,
                "no configured duo for flagged record, closing it"
            );
            close_record(ledger.record_mut(flag.index), self.week);
            return;
        };
        debug_assert!(record.slot_index <= 1);
        let tracked = &duo[record.slot_index];
        let roster_players = self
            .league
            .roster(&record.team_name)
            .map(|roster| roster.players.as_slice())
            .unwrap_or(&[]);
        let original_id = resolve_player(
            tracked,
            roster_players,
            &self.league.players,
            GlobalSearch::RosterOnly,
        );
        let original_status = original_id
            .as_ref()
            .map(|id| self.classifier.classify(id, self.week).status);

        if matches!(
            original_status,
            Some(AvailabilityStatus::Healthy) | Some(AvailabilityStatus::Questionable)
        ) {
            close_record(ledger.record_mut(flag.index), self.week);
            stats.recovered_originals += 1;
            info!(
                team = %record.team_name,
                award = %record.award_type,
                player = %tracked.name,
                "original player recovered, closing substitution"
            );
            return;
        }

        // A substitute on bye sits out one week; their record stays open
        // and a one-week overlay covers the gap.
        let bye_overlay = flag.cause == FlagCause::Status(AvailabilityStatus::Bye);
        if !bye_overlay {
            close_record(ledger.record_mut(flag.index), self.week);
        }

        if ledger.has_active_record_for(
            &record.team_name,
            record.award_type,
            record.slot_index,
            self.week,
        ) {
            debug!(
                team = %record.team_name,
                award = %record.award_type,
                slot = record.slot_index,
                "slot already has a record starting this week"
            );
            return;
        }

        let slot = UnavailableSlot {
            slot_index: record.slot_index,
            tracked: tracked.clone(),
            player_id: original_id.unwrap_or_default(),
            status: original_status.unwrap_or(AvailabilityStatus::Out),
        };
        let partner = self.resolved_partner(
            ledger,
            &record.team_name,
            record.award_type,
            duo,
            record.slot_index,
        );
        let reserved = self.reserved_for(ledger, &record.team_name, record.award_type);
        let cause = flag.cause.describe();
        match self.selector.select(
            &record.team_name,
            record.award_type,
            &slot,
            &partner,
            self.week,
            &reserved,
            rng,
        ) {
            Some(candidate) => {
                let end_week = if bye_overlay || slot.status == AvailabilityStatus::Bye {
                    Some(self.week)
                } else {
                    default_end(record.award_type, self.week)
                };
                let reason = format!("{} - substitute {}", self.reason_label, cause);
                ledger.push(self.build_record(
                    &record.team_name,
                    record.award_type,
                    &slot,
                    &candidate,
                    end_week,
                    reason,
                ));
                stats.forced_replacements += 1;
            }
            None => {
                ledger.push(SubstitutionRecord::sentinel(
                    record.team_name.clone(),
                    record.award_type,
                    record.slot_index,
                    tracked,
                    self.week,
                    format!("{} - no eligible substitute", self.reason_label),
                ));
                stats.sentinels += 1;
            }
        }
    }

    /// Find fresh injuries and open records for slots not yet covered.
    fn new_injury_pass<R: Rng + ?Sized>(
        &self,
        ledger: &mut SubstitutionLedger,
        stats: &mut LedgerStats,
        rng: &mut R,
    ) {
        let report = detect_unavailable(self.config, self.league, self.classifier, self.week);
        for (award, teams) in report {
            for (team, slots) in teams {
                for slot in slots {
                    if let Some(existing) =
                        ledger.record_in_effect(&team, award, slot.slot_index, self.week)
                    {
                        debug!(
                            team = %team,
                            award = %award,
                            player = %slot.tracked.name,
                            covered_since = existing.start_week,
                            "slot already covered, skipping"
                        );
                        continue;
                    }
                    if ledger.has_active_record_for(&team, award, slot.slot_index, self.week) {
                        continue;
                    }
                    let Some(duo) = self.config.duo(award, &team) else {
                        continue;
                    };

                    let partner = self.resolved_partner(ledger, &team, award, duo, slot.slot_index);
                    let reserved = self.reserved_for(ledger, &team, award);
                    match self
                        .selector
                        .select(&team, award, &slot, &partner, self.week, &reserved, rng)
                    {
                        Some(candidate) => {
                            let end_week = if slot.status == AvailabilityStatus::Bye {
                                Some(self.week)
                            } else {
                                default_end(award, self.week)
                            };
                            let reason = format!("{} - {}", self.reason_label, slot.status);
                            ledger.push(self.build_record(
                                &team, award, &slot, &candidate, end_week, reason,
                            ));
                            stats.new_substitutions += 1;
                        }
                        None => {
                            ledger.push(SubstitutionRecord::sentinel(
                                team.clone(),
                                award,
                                slot.slot_index,
                                &slot.tracked,
                                self.week,
                                format!("{} - no eligible substitute", self.reason_label),
                            ));
                            stats.sentinels += 1;
                        }
                    }
                }
            }
        }
    }

    fn build_record(
        &self,
        team: &str,
        award: AwardType,
        slot: &UnavailableSlot,
        candidate: &SubstituteCandidate,
        end_week: Option<Week>,
        reason: String,
    ) -> SubstitutionRecord {
        SubstitutionRecord {
            team_name: team.to_string(),
            award_type: award,
            slot_index: slot.slot_index,
            original_name: slot.tracked.name.clone(),
            original_position: slot.tracked.position,
            substitute_player_id: Some(candidate.player_id.clone()),
            substitute_name: Some(candidate.name.clone()),
            substitute_position: Some(candidate.position),
            start_week: self.week,
            end_week,
            active: true,
            reason,
            auto_generated: true,
        }
    }

    /// The pairing constraint for a slot comes from whoever actually holds
    /// the other slot this week: an in-effect substitute if there is one,
    /// otherwise the configured original.
    fn resolved_partner(
        &self,
        ledger: &SubstitutionLedger,
        team: &str,
        award: AwardType,
        duo: &[TrackedPlayer; 2],
        slot_index: usize,
    ) -> PairingPartner {
        debug_assert!(slot_index <= 1);
        let partner_index = 1 - slot_index;
        let original = &duo[partner_index];
        if let Some(record) = ledger.record_in_effect(team, award, partner_index, self.week) {
            if !record.is_sentinel() {
                let position = record.substitute_position.unwrap_or(original.position);
                let experience = record
                    .substitute_player_id
                    .as_deref()
                    .and_then(|id| self.league.player(id))
                    .and_then(|player| player.experience_tier());
                return PairingPartner {
                    position,
                    experience,
                };
            }
        }
        PairingPartner::from_tracked(original)
    }

    /// Player ids already committed for this team and award in the current
    /// week: every in-effect record's substitute. Keeps one bench player
    /// from filling both slots.
    fn reserved_for(
        &self,
        ledger: &SubstitutionLedger,
        team: &str,
        award: AwardType,
    ) -> Vec<PlayerId> {
        ledger
            .records()
            .iter()
            .filter(|record| {
                record.team_name == team
                    && record.award_type == award
                    && record.in_effect(self.week)
            })
            .filter_map(|record| record.substitute_player_id.clone())
            .collect()
    }
}

fn close_record(record: &mut SubstitutionRecord, week: Week) {
    record.active = false;
    record.end_week = Some(if record.start_week >= week {
        record.start_week
    } else {
        week - 1
    });
}

fn default_end(award: AwardType, week: Week) -> Option<Week> {
    match award {
        AwardType::Main => Some(week),
        AwardType::NextUp => None,
    }
}
