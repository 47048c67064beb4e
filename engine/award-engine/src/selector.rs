//! Substitute selection: build the eligible pool for a vacated slot, rank
//! it by trailing production, and pick.
//!
//! Main award picks are a weighted draw over the top four so the hottest
//! bench player is favored but not guaranteed. Next-Up picks are strictly
//! the top scorer, since tier pairing already narrows the pool.

use std::cmp::Ordering;

use rand::Rng;
use tracing::{debug, info};

use crate::availability::AvailabilityClassifier;
use crate::config::SeasonConfig;
use crate::detector::UnavailableSlot;
use crate::league::LeagueView;
use crate::lookup::{resolve_player, GlobalSearch};
use crate::types::{
    AvailabilityStatus, AwardType, ExperienceTier, PlayerId, PlatformPlayer, Position, TrackedPlayer,
    Week,
};

/// Draw weights for the Main award, best trailing score first.
pub const MAIN_DRAW_WEIGHTS: [f64; 4] = [0.40, 0.30, 0.20, 0.10];

/// A roster player eligible to fill a vacated slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstituteCandidate {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub years_exp: u8,
    /// Trailing three-week fantasy points at selection time.
    pub trailing_points: f64,
}

/// The player currently holding the other half of the duo, as resolved for
/// the week under decision. When the partner slot is itself substituted the
/// pairing rules bind against the substitute, not the absent original, so
/// two simultaneous substitutions cannot collapse into an illegal pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingPartner {
    pub position: Position,
    pub experience: Option<ExperienceTier>,
}

impl PairingPartner {
    pub fn from_tracked(tracked: &TrackedPlayer) -> PairingPartner {
        PairingPartner {
            position: tracked.position,
            experience: tracked.experience,
        }
    }
}

pub struct SubstituteSelector<'a> {
    config: &'a SeasonConfig,
    league: &'a LeagueView,
    classifier: &'a AvailabilityClassifier<'a>,
}

impl<'a> SubstituteSelector<'a> {
    pub fn new(
        config: &'a SeasonConfig,
        league: &'a LeagueView,
        classifier: &'a AvailabilityClassifier<'a>,
    ) -> Self {
        SubstituteSelector {
            config,
            league,
            classifier,
        }
    }

    /// Pick a substitute for an unavailable slot, or `None` when the roster
    /// offers nobody eligible.
    ///
    /// `reserved` carries player ids already spoken for in this run, so two
    /// vacated slots never receive the same bench player.
    pub fn select<R: Rng + ?Sized>(
        &self,
        team: &str,
        award: AwardType,
        slot: &UnavailableSlot,
        partner: &PairingPartner,
        week: Week,
        reserved: &[PlayerId],
        rng: &mut R,
    ) -> Option<SubstituteCandidate> {
        let roster = self.league.roster(team)?;
        let other_award_ids = self.tracked_ids(team, award.other(), &roster.players);

        let mut pool: Vec<SubstituteCandidate> = Vec::new();
        for player_id in &roster.players {
            if *player_id == slot.player_id
                || reserved.contains(player_id)
                || other_award_ids.contains(player_id)
            {
                continue;
            }
            let Some(player) = self.league.player(player_id) else {
                continue;
            };
            let Some(position) = player.position else {
                continue;
            };

            let availability = self.classifier.classify(player_id, week);
            if availability.locked {
                continue;
            }
            if !matches!(
                availability.status,
                AvailabilityStatus::Healthy | AvailabilityStatus::Questionable
            ) {
                continue;
            }
            if !pair_allowed(award, partner, player, position) {
                continue;
            }

            pool.push(SubstituteCandidate {
                player_id: player_id.clone(),
                name: player.full_name(),
                position,
                years_exp: player.years_exp.unwrap_or(0),
                trailing_points: self.league.scores.trailing_total(player_id, week),
            });
        }

        if pool.is_empty() {
            info!(
                team = %team,
                award = %award,
                player = %slot.tracked.name,
                "no eligible substitute on roster"
            );
            return None;
        }

        pool.sort_by(|a, b| {
            b.trailing_points
                .partial_cmp(&a.trailing_points)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.player_id.cmp(&b.player_id))
        });

        let picked = match award {
            AwardType::NextUp => pool.remove(0),
            AwardType::Main => weighted_draw(&mut pool, rng),
        };
        info!(
            team = %team,
            award = %award,
            player = %slot.tracked.name,
            substitute = %picked.name,
            position = %picked.position,
            trailing_points = picked.trailing_points,
            "selected substitute"
        );
        Some(picked)
    }

    /// Resolved ids of the duo tracked for `award`, used to wall the two
    /// awards off from each other.
    fn tracked_ids(&self, team: &str, award: AwardType, roster: &[PlayerId]) -> Vec<PlayerId> {
        let Some(duo) = self.config.duo(award, team) else {
            return Vec::new();
        };
        duo.iter()
            .filter_map(|tracked| {
                resolve_player(tracked, roster, &self.league.players, GlobalSearch::RosterOnly)
            })
            .collect()
    }
}

fn pair_allowed(
    award: AwardType,
    partner: &PairingPartner,
    candidate: &PlatformPlayer,
    position: Position,
) -> bool {
    match award {
        AwardType::Main => position.main_eligible() && position != partner.position,
        AwardType::NextUp => {
            let Some(tier) = ExperienceTier::from_years_exp(candidate.years_exp.unwrap_or(0))
            else {
                return false;
            };
            let Some(partner_tier) = partner.experience else {
                return false;
            };
            tier == partner_tier.opposite()
                && !(position == Position::QB && partner.position == Position::QB)
        }
    }
}

/// Weighted draw over the top of the ranked pool. With fewer than four
/// candidates the leading weights are renormalized over what exists.
fn weighted_draw<R: Rng + ?Sized>(
    pool: &mut Vec<SubstituteCandidate>,
    rng: &mut R,
) -> SubstituteCandidate {
    pool.truncate(MAIN_DRAW_WEIGHTS.len());
    let weights = &MAIN_DRAW_WEIGHTS[..pool.len()];
    let total: f64 = weights.iter().sum();
    let mut roll = rng.gen_range(0.0..total);
    for (index, weight) in weights.iter().enumerate() {
        if roll < *weight {
            return pool.swap_remove(index);
        }
        roll -= weight;
    }
    let last = pool.len() - 1;
    pool.swap_remove(last)
}
