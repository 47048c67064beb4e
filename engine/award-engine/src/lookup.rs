//! Name resolution between configured duo members and platform player ids.
//!
//! The season config stores display names; the platform speaks in numeric
//! ids. Matching is two-stage: an exact full-name comparison wins over a
//! relaxed last-name match that tolerates shortened first names such as
//! "Cam Ward" for "Cameron Ward".

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::{PlayerId, PlatformPlayer, TrackedPlayer};

/// Whether resolution may fall back to the full player directory when the
/// roster has no match. Score resolution wants the fallback so traded
/// players keep their historical points; substitution passes do not, since
/// a player off the roster cannot hold a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalSearch {
    RosterOnly,
    Allowed,
}

/// Resolve a tracked player to a platform id.
///
/// Exact matches over the whole roster are preferred to relaxed matches
/// anywhere, so "Lamar Jackson" never resolves to a teammate who merely
/// shares the last name and initial.
pub fn resolve_player(
    tracked: &TrackedPlayer,
    roster: &[PlayerId],
    directory: &BTreeMap<PlayerId, PlatformPlayer>,
    global: GlobalSearch,
) -> Option<PlayerId> {
    let target = normalize(&tracked.name);
    if target.is_empty() {
        return None;
    }

    let roster_players = roster.iter().filter_map(|id| directory.get(id));
    if let Some(id) = scan(roster_players.clone(), &target, MatchRule::Exact) {
        return Some(id);
    }
    if let Some(id) = scan(roster_players, &target, MatchRule::Relaxed) {
        return Some(id);
    }

    if global == GlobalSearch::Allowed {
        if let Some(id) = scan(directory.values(), &target, MatchRule::Exact) {
            debug!(player = %tracked.name, "resolved outside roster");
            return Some(id);
        }
        if let Some(id) = scan(directory.values(), &target, MatchRule::Relaxed) {
            debug!(player = %tracked.name, "resolved outside roster via relaxed match");
            return Some(id);
        }
    }

    None
}

#[derive(Clone, Copy)]
enum MatchRule {
    Exact,
    Relaxed,
}

fn scan<'a>(
    players: impl Iterator<Item = &'a PlatformPlayer>,
    target: &[String],
    rule: MatchRule,
) -> Option<PlayerId> {
    for player in players {
        let candidate = normalize(&player.full_name());
        let hit = match rule {
            MatchRule::Exact => candidate == target,
            MatchRule::Relaxed => relaxed_match(target, &candidate),
        };
        if hit {
            return Some(player.id.clone());
        }
    }
    None
}

/// Last names must match exactly and the first names must agree on their
/// initial, checked in both directions so neither spelling has to be the
/// longer one.
fn relaxed_match(a: &[String], b: &[String]) -> bool {
    let (Some(a_first), Some(a_last)) = (a.first(), a.last()) else {
        return false;
    };
    let (Some(b_first), Some(b_last)) = (b.first(), b.last()) else {
        return false;
    };
    if a.len() < 2 || b.len() < 2 || a_last != b_last {
        return false;
    }
    let (Some(a_initial), Some(b_initial)) = (initial(a_first), initial(b_first)) else {
        return false;
    };
    a_first.starts_with(b_initial) || b_first.starts_with(a_initial)
}

fn initial(name: &str) -> Option<char> {
    name.chars().next()
}

fn normalize(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect()
}
