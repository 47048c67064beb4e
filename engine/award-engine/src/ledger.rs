//! The substitution ledger: every decision the engine has made, kept as an
//! append-friendly list of week-ranged records.
//!
//! Records are never silently rewritten into a different decision. Cleanup
//! repairs malformed ranges, drops impossible future records, and resolves
//! overlaps, but a record that once drove scoring stays in the ledger so
//! past weeks keep resolving the same way.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::types::{AwardType, Position, TeamName, TrackedPlayer, Week};

/// One substitution decision, bounded to a week range. `end_week == None`
/// means the substitution runs until further notice.
///
/// A record with no substitute id is a sentinel: the slot had an unavailable
/// player and no eligible replacement, so it scores zero for the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionRecord {
    pub team_name: TeamName,
    pub award_type: AwardType,
    /// Which half of the duo this record covers, 0 or 1.
    pub slot_index: usize,
    pub original_name: String,
    pub original_position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitute_player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitute_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitute_position: Option<Position>,
    pub start_week: Week,
    #[serde(default)]
    pub end_week: Option<Week>,
    /// Whether this is the live substitution for its slot. Closed records
    /// and sentinels carry `false` but still resolve historical weeks.
    pub active: bool,
    pub reason: String,
    /// `false` for records entered by hand (trades, manager rulings).
    /// Manual records are never repaired, truncated, or dropped.
    pub auto_generated: bool,
}

impl SubstitutionRecord {
    /// Sentinel record: no eligible substitute existed, slot scores zero
    /// for the covered week.
    pub fn sentinel(
        team: impl Into<TeamName>,
        award: AwardType,
        slot_index: usize,
        original: &TrackedPlayer,
        week: Week,
        reason: impl Into<String>,
    ) -> SubstitutionRecord {
        SubstitutionRecord {
            team_name: team.into(),
            award_type: award,
            slot_index,
            original_name: original.name.clone(),
            original_position: original.position,
            substitute_player_id: None,
            substitute_name: None,
            substitute_position: None,
            start_week: week,
            end_week: Some(week),
            active: false,
            reason: reason.into(),
            auto_generated: true,
        }
    }

    /// Whether this record covers `week`.
    pub fn in_effect(&self, week: Week) -> bool {
        self.start_week <= week && self.end_week.map_or(true, |end| week <= end)
    }

    pub fn is_sentinel(&self) -> bool {
        self.substitute_player_id.is_none()
    }

    fn slot_key(&self) -> (&str, AwardType, usize) {
        (self.team_name.as_str(), self.award_type, self.slot_index)
    }
}

/// The full set of substitution records for a season.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionLedger {
    records: Vec<SubstitutionRecord>,
}

impl SubstitutionLedger {
    pub fn new(records: Vec<SubstitutionRecord>) -> SubstitutionLedger {
        SubstitutionLedger { records }
    }

    pub fn records(&self) -> &[SubstitutionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SubstitutionRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: SubstitutionRecord) {
        self.records.push(record);
    }

    pub(crate) fn record_mut(&mut self, index: usize) -> &mut SubstitutionRecord {
        &mut self.records[index]
    }

    /// Adopt a manually entered record, skipping it if a record for the same
    /// slot and start week is already present.
    pub fn merge_manual(&mut self, mut record: SubstitutionRecord) -> bool {
        record.auto_generated = false;
        let duplicate = self.records.iter().any(|existing| {
            existing.slot_key() == record.slot_key() && existing.start_week == record.start_week
        });
        if duplicate {
            debug!(
                team = %record.team_name,
                award = %record.award_type,
                slot = record.slot_index,
                start = record.start_week,
                "manual record already present, skipping"
            );
            return false;
        }
        info!(
            team = %record.team_name,
            award = %record.award_type,
            slot = record.slot_index,
            start = record.start_week,
            "adopting manual substitution record"
        );
        self.records.push(record);
        true
    }

    /// The record that resolves this slot for `week`, if any. When several
    /// records cover the week, the one with the greatest start week wins,
    /// and among equal start weeks the most recently appended. Sentinels
    /// and closed records participate so overlays and zero-weeks resolve.
    pub fn record_in_effect(
        &self,
        team: &str,
        award: AwardType,
        slot_index: usize,
        week: Week,
    ) -> Option<&SubstitutionRecord> {
        let mut best: Option<&SubstitutionRecord> = None;
        for record in &self.records {
            if record.slot_key() != (team, award, slot_index) || !record.in_effect(week) {
                continue;
            }
            match best {
                Some(current) if record.start_week < current.start_week => {}
                _ => best = Some(record),
            }
        }
        best
    }

    /// Whether an active record for this exact slot and start week exists.
    /// Guards against the same pass stacking duplicate decisions.
    pub fn has_active_record_for(
        &self,
        team: &str,
        award: AwardType,
        slot_index: usize,
        start_week: Week,
    ) -> bool {
        self.records.iter().any(|record| {
            record.active
                && record.slot_key() == (team, award, slot_index)
                && record.start_week == start_week
        })
    }

    /// Repair and prune automated records. Returns how many were dropped.
    ///
    /// Three steps: inverted ranges become open-ended, records starting in
    /// the future are removed, and overlapping active records for the same
    /// slot are reconciled. Manual records pass through untouched.
    pub fn cleanup(&mut self, current_week: Week) -> usize {
        let before = self.records.len();

        for record in &mut self.records {
            if !record.auto_generated {
                continue;
            }
            if let Some(end) = record.end_week {
                if end < record.start_week {
                    warn!(
                        team = %record.team_name,
                        award = %record.award_type,
                        slot = record.slot_index,
                        start = record.start_week,
                        end,
                        "repairing inverted substitution range to open-ended"
                    );
                    record.end_week = None;
                }
            }
        }

        self.records.retain(|record| {
            let drop = record.auto_generated && record.start_week > current_week;
            if drop {
                warn!(
                    team = %record.team_name,
                    award = %record.award_type,
                    slot = record.slot_index,
                    start = record.start_week,
                    current_week,
                    "dropping future-dated substitution record"
                );
            }
            !drop
        });

        self.resolve_overlaps();
        before - self.records.len()
    }

    /// Reconcile overlapping active automated records slot by slot. The
    /// later-starting record is authoritative: an earlier open-ended record
    /// is truncated to end just before it. The one sanctioned overlap is a
    /// bounded stopgap sitting inside a longer record (a bye-week overlay),
    /// which stays as-is and is resolved by start-week precedence.
    fn resolve_overlaps(&mut self) {
        let mut groups: BTreeMap<(TeamName, AwardType, usize), Vec<usize>> = BTreeMap::new();
        for (index, record) in self.records.iter().enumerate() {
            if record.active && record.auto_generated {
                groups
                    .entry((record.team_name.clone(), record.award_type, record.slot_index))
                    .or_default()
                    .push(index);
            }
        }

        for indices in groups.into_values() {
            let mut ordered = indices;
            ordered.sort_by_key(|&i| (self.records[i].start_week, i));
            for later in 1..ordered.len() {
                for earlier in 0..later {
                    self.reconcile_pair(ordered[earlier], ordered[later]);
                }
            }
        }
    }

    fn reconcile_pair(&mut self, earlier: usize, later: usize) {
        if !self.records[earlier].active {
            return;
        }
        let (a_start, a_end) = (self.records[earlier].start_week, self.records[earlier].end_week);
        let (b_start, b_end) = (self.records[later].start_week, self.records[later].end_week);
        let overlaps = a_end.map_or(true, |end| end >= b_start);
        if !overlaps {
            return;
        }

        if a_start == b_start {
            let record = &mut self.records[earlier];
            record.active = false;
            record.end_week = Some(record.start_week);
            warn!(
                team = %record.team_name,
                award = %record.award_type,
                slot = record.slot_index,
                start = record.start_week,
                "deactivating duplicate substitution record"
            );
        } else if b_end.map_or(false, |be| a_end.map_or(true, |ae| ae > be)) {
            debug!(
                team = %self.records[earlier].team_name,
                overlay_start = b_start,
                "keeping bounded overlay inside longer substitution"
            );
        } else {
            let record = &mut self.records[earlier];
            record.end_week = Some(b_start - 1);
            debug!(
                team = %record.team_name,
                award = %record.award_type,
                slot = record.slot_index,
                truncated_to = b_start - 1,
                "truncating superseded substitution record"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(name: &str, position: Position) -> TrackedPlayer {
        TrackedPlayer {
            name: name.to_string(),
            position,
            experience: None,
        }
    }

    fn record(
        team: &str,
        award: AwardType,
        slot: usize,
        start: Week,
        end: Option<Week>,
        active: bool,
    ) -> SubstitutionRecord {
        SubstitutionRecord {
            team_name: team.to_string(),
            award_type: award,
            slot_index: slot,
            original_name: "Original Player".to_string(),
            original_position: Position::RB,
            substitute_player_id: Some("999".to_string()),
            substitute_name: Some("Bench Player".to_string()),
            substitute_position: Some(Position::WR),
            start_week: start,
            end_week: end,
            active,
            reason: "Injury Checkpoint (3) - out".to_string(),
            auto_generated: true,
        }
    }

    #[test]
    fn in_effect_honors_open_and_bounded_ranges() {
        let bounded = record("Alpha", AwardType::Main, 0, 3, Some(3), true);
        assert!(!bounded.in_effect(2));
        assert!(bounded.in_effect(3));
        assert!(!bounded.in_effect(4));

        let open = record("Alpha", AwardType::NextUp, 0, 3, None, true);
        assert!(open.in_effect(3));
        assert!(open.in_effect(17));
    }

    #[test]
    fn cleanup_repairs_inverted_ranges() {
        let mut ledger = SubstitutionLedger::new(vec![record(
            "Alpha",
            AwardType::Main,
            0,
            6,
            Some(4),
            true,
        )]);
        let dropped = ledger.cleanup(8);
        assert_eq!(dropped, 0);
        assert_eq!(ledger.records()[0].end_week, None);
    }

    #[test]
    fn cleanup_drops_future_dated_records() {
        let mut ledger = SubstitutionLedger::new(vec![
            record("Alpha", AwardType::Main, 0, 9, Some(9), true),
            record("Alpha", AwardType::Main, 1, 4, Some(4), true),
        ]);
        let dropped = ledger.cleanup(5);
        assert_eq!(dropped, 1);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.records()[0].slot_index, 1);
    }

    #[test]
    fn cleanup_never_touches_manual_records() {
        let mut manual = record("Alpha", AwardType::Main, 0, 12, Some(9), true);
        manual.auto_generated = false;
        let mut ledger = SubstitutionLedger::new(vec![manual.clone()]);
        let dropped = ledger.cleanup(5);
        assert_eq!(dropped, 0);
        assert_eq!(ledger.records()[0], manual);
    }

    #[test]
    fn cleanup_truncates_superseded_open_record() {
        let mut ledger = SubstitutionLedger::new(vec![
            record("Alpha", AwardType::NextUp, 0, 3, None, true),
            record("Alpha", AwardType::NextUp, 0, 7, None, true),
        ]);
        ledger.cleanup(8);
        assert_eq!(ledger.records()[0].end_week, Some(6));
        assert_eq!(ledger.records()[1].end_week, None);
        assert!(ledger.records()[0].active);
    }

    #[test]
    fn cleanup_keeps_bounded_overlay_inside_open_record() {
        let mut ledger = SubstitutionLedger::new(vec![
            record("Beta", AwardType::NextUp, 1, 3, None, true),
            record("Beta", AwardType::NextUp, 1, 6, Some(6), true),
        ]);
        ledger.cleanup(7);
        assert_eq!(ledger.records()[0].end_week, None);
        assert_eq!(ledger.records()[1].end_week, Some(6));
        let week6 = ledger.record_in_effect("Beta", AwardType::NextUp, 1, 6).unwrap();
        assert_eq!(week6.start_week, 6);
        let week7 = ledger.record_in_effect("Beta", AwardType::NextUp, 1, 7).unwrap();
        assert_eq!(week7.start_week, 3);
    }

    #[test]
    fn cleanup_deactivates_duplicate_starts() {
        let mut ledger = SubstitutionLedger::new(vec![
            record("Alpha", AwardType::Main, 0, 5, Some(5), true),
            record("Alpha", AwardType::Main, 0, 5, Some(5), true),
        ]);
        ledger.cleanup(6);
        assert!(!ledger.records()[0].active);
        assert!(ledger.records()[1].active);
        let winner = ledger.record_in_effect("Alpha", AwardType::Main, 0, 5).unwrap();
        assert!(winner.active);
    }

    #[test]
    fn record_in_effect_prefers_latest_start() {
        let ledger = SubstitutionLedger::new(vec![
            record("Alpha", AwardType::NextUp, 0, 3, Some(5), true),
            record("Alpha", AwardType::NextUp, 0, 6, None, true),
        ]);
        assert_eq!(
            ledger.record_in_effect("Alpha", AwardType::NextUp, 0, 4).unwrap().start_week,
            3
        );
        assert_eq!(
            ledger.record_in_effect("Alpha", AwardType::NextUp, 0, 9).unwrap().start_week,
            6
        );
        assert!(ledger.record_in_effect("Alpha", AwardType::NextUp, 0, 2).is_none());
        assert!(ledger.record_in_effect("Alpha", AwardType::NextUp, 1, 4).is_none());
    }

    #[test]
    fn merge_manual_respects_existing_slot_and_start() {
        let mut ledger = SubstitutionLedger::new(vec![record(
            "Alpha",
            AwardType::Main,
            0,
            5,
            Some(5),
            true,
        )]);
        let mut manual = record("Alpha", AwardType::Main, 0, 5, Some(7), true);
        manual.auto_generated = false;
        assert!(!ledger.merge_manual(manual.clone()));
        manual.start_week = 6;
        assert!(ledger.merge_manual(manual));
        assert_eq!(ledger.len(), 2);
        assert!(!ledger.records()[1].auto_generated);
    }

    #[test]
    fn sentinel_records_resolve_and_report() {
        let sentinel = SubstitutionRecord::sentinel(
            "Alpha",
            AwardType::Main,
            1,
            &tracked("Hurt Guy", Position::WR),
            4,
            "Injury Checkpoint (2) - no eligible substitute",
        );
        assert!(sentinel.is_sentinel());
        assert!(!sentinel.active);
        assert_eq!(sentinel.end_week, Some(4));
        let ledger = SubstitutionLedger::new(vec![sentinel]);
        assert!(ledger.record_in_effect("Alpha", AwardType::Main, 1, 4).is_some());
        assert!(ledger.record_in_effect("Alpha", AwardType::Main, 1, 5).is_none());
    }

    #[test]
    fn records_serialize_camel_case() {
        let rec = record("Alpha", AwardType::Main, 0, 5, None, true);
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"teamName\""));
        assert!(json.contains("\"slotIndex\""));
        assert!(json.contains("\"startWeek\""));
        assert!(json.contains("\"endWeek\":null"));
        assert!(json.contains("\"autoGenerated\":true"));
        let back: SubstitutionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
