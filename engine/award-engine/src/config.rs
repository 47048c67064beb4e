//! Season configuration: the duo declarations and season-shaped tables the
//! engine runs against.
//!
//! Loaded from a JSON file once per run. Shape (camelCase keys):
//!
//! ```json
//! {
//!   "season": "2025",
//!   "seasonStart": "2025-09-04T00:00:00Z",
//!   "duos": {
//!     "main":   { "Team Alpha": [ { "name": "...", "position": "QB" }, ... ] },
//!     "nextup": { "Team Alpha": [ { "name": "...", "position": "WR", "experience": "rookie" }, ... ] }
//!   },
//!   "byeWeeks": { "KC": 10 },
//!   "internationalWeeks": { "4": ["MIN", "PIT"] },
//!   "inactiveTeams": {}, "managerChanges": {},
//!   "manualSubstitutions": [], "scoreCorrections": []
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::ledger::SubstitutionRecord;
use crate::types::{
    AwardType, ExperienceTier, NflTeam, Position, TeamName, TrackedPlayer, Week, FIRST_WEEK,
    LAST_WEEK,
};

/// A hand-entered score override applied after resolution, for weeks where
/// the platform's stat feed was wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCorrection {
    pub team_name: TeamName,
    pub award_type: AwardType,
    pub slot_index: usize,
    pub week: Week,
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonConfig {
    /// Season year as the schedule source spells it, e.g. "2025".
    pub season: String,
    /// Kickoff of week 1's first game, anchor for week arithmetic.
    pub season_start: DateTime<Utc>,
    /// Tracked duos per award, keyed by fantasy team name. Each entry is
    /// exactly two slots in declaration order.
    pub duos: BTreeMap<AwardType, BTreeMap<TeamName, [TrackedPlayer; 2]>>,
    /// Bye week per NFL franchise abbreviation.
    #[serde(default)]
    pub bye_weeks: BTreeMap<NflTeam, Week>,
    /// Franchises playing early international games, per week.
    #[serde(default)]
    pub international_weeks: BTreeMap<Week, Vec<NflTeam>>,
    /// Teams that left the league; their historical scores replay as-is.
    #[serde(default)]
    pub inactive_teams: BTreeMap<TeamName, String>,
    #[serde(default)]
    pub manager_changes: BTreeMap<TeamName, String>,
    /// Trade and ruling records merged into the ledger ahead of every run.
    #[serde(default)]
    pub manual_substitutions: Vec<SubstitutionRecord>,
    #[serde(default)]
    pub score_corrections: Vec<ScoreCorrection>,
}

impl SeasonConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<SeasonConfig, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config: SeasonConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        info!(
            path = %path.display(),
            season = %config.season,
            main_duos = config.duos.get(&AwardType::Main).map_or(0, |d| d.len()),
            next_up_duos = config.duos.get(&AwardType::NextUp).map_or(0, |d| d.len()),
            "loaded season config"
        );
        Ok(config)
    }

    pub fn duos_for(&self, award: AwardType) -> Option<&BTreeMap<TeamName, [TrackedPlayer; 2]>> {
        self.duos.get(&award)
    }

    pub fn duo(&self, award: AwardType, team: &str) -> Option<&[TrackedPlayer; 2]> {
        self.duos.get(&award).and_then(|teams| teams.get(team))
    }

    /// Franchises with an early slate in the given week.
    pub fn international_teams(&self, week: Week) -> &[NflTeam] {
        self.international_weeks
            .get(&week)
            .map(|teams| teams.as_slice())
            .unwrap_or(&[])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(mains) = self.duos.get(&AwardType::Main) {
            for (team, duo) in mains {
                validate_main_duo(team, duo)?;
            }
        }
        if let Some(next_ups) = self.duos.get(&AwardType::NextUp) {
            for (team, duo) in next_ups {
                validate_next_up_duo(team, duo)?;
            }
        }

        for (team, week) in &self.bye_weeks {
            validate_week(*week, || format!("bye week for {team}"))?;
        }
        for week in self.international_weeks.keys() {
            validate_week(*week, || "international week".to_string())?;
        }

        for correction in &self.score_corrections {
            validate_week(correction.week, || {
                format!("score correction for {}", correction.team_name)
            })?;
            if correction.slot_index > 1 {
                return Err(ConfigError::invalid(format!(
                    "score correction for {} names slot {}, slots are 0 and 1",
                    correction.team_name, correction.slot_index
                )));
            }
        }

        for record in &self.manual_substitutions {
            if record.slot_index > 1 {
                return Err(ConfigError::invalid(format!(
                    "manual substitution for {} names slot {}, slots are 0 and 1",
                    record.team_name, record.slot_index
                )));
            }
            if record.substitute_player_id.is_none() {
                return Err(ConfigError::invalid(format!(
                    "manual substitution for {} has no substitute player id",
                    record.team_name
                )));
            }
            validate_week(record.start_week, || {
                format!("manual substitution for {}", record.team_name)
            })?;
            if let Some(end) = record.end_week {
                if end < record.start_week {
                    return Err(ConfigError::invalid(format!(
                        "manual substitution for {} ends week {} before it starts week {}",
                        record.team_name, end, record.start_week
                    )));
                }
            }
        }

        Ok(())
    }
}

fn validate_week(week: Week, what: impl Fn() -> String) -> Result<(), ConfigError> {
    if !(FIRST_WEEK..=LAST_WEEK).contains(&week) {
        return Err(ConfigError::invalid(format!(
            "{} is week {week}, outside {FIRST_WEEK}..{LAST_WEEK}",
            what()
        )));
    }
    Ok(())
}

fn validate_main_duo(team: &str, duo: &[TrackedPlayer; 2]) -> Result<(), ConfigError> {
    for slot in duo {
        if !slot.position.main_eligible() {
            return Err(ConfigError::invalid(format!(
                "main duo for {team} includes {} at {}, main pairs draw from QB/RB/WR",
                slot.name, slot.position
            )));
        }
    }
    if duo[0].position == duo[1].position {
        return Err(ConfigError::invalid(format!(
            "main duo for {team} pairs two {}s, positions must differ",
            duo[0].position
        )));
    }
    Ok(())
}

fn validate_next_up_duo(team: &str, duo: &[TrackedPlayer; 2]) -> Result<(), ConfigError> {
    let mut tiers: [Option<ExperienceTier>; 2] = [None, None];
    for (index, slot) in duo.iter().enumerate() {
        match slot.experience {
            Some(tier) => tiers[index] = Some(tier),
            None => {
                return Err(ConfigError::invalid(format!(
                    "next-up duo for {team} is missing an experience tier for {}",
                    slot.name
                )))
            }
        }
    }
    if tiers[0] == tiers[1] {
        return Err(ConfigError::invalid(format!(
            "next-up duo for {team} pairs two {}s, tiers must differ",
            duo[0].experience.map(|t| t.to_string()).unwrap_or_default()
        )));
    }
    if duo[0].position == Position::QB && duo[1].position == Position::QB {
        return Err(ConfigError::invalid(format!(
            "next-up duo for {team} pairs two quarterbacks"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str, position: Position, experience: Option<ExperienceTier>) -> TrackedPlayer {
        TrackedPlayer {
            name: name.to_string(),
            position,
            experience,
        }
    }

    fn base_config() -> SeasonConfig {
        let mut duos = BTreeMap::new();
        duos.insert(
            AwardType::Main,
            BTreeMap::from([(
                "Team Alpha".to_string(),
                [
                    slot("Josh Allen", Position::QB, None),
                    slot("Bijan Robinson", Position::RB, None),
                ],
            )]),
        );
        duos.insert(
            AwardType::NextUp,
            BTreeMap::from([(
                "Team Alpha".to_string(),
                [
                    slot("Malik Nabers", Position::WR, Some(ExperienceTier::Sophomore)),
                    slot("Ashton Jeanty", Position::RB, Some(ExperienceTier::Rookie)),
                ],
            )]),
        );
        SeasonConfig {
            season: "2025".to_string(),
            season_start: "2025-09-04T00:00:00Z".parse().unwrap(),
            duos,
            bye_weeks: BTreeMap::new(),
            international_weeks: BTreeMap::new(),
            inactive_teams: BTreeMap::new(),
            manager_changes: BTreeMap::new(),
            manual_substitutions: Vec::new(),
            score_corrections: Vec::new(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn main_duo_rejects_same_position() {
        let mut config = base_config();
        config
            .duos
            .get_mut(&AwardType::Main)
            .unwrap()
            .insert(
                "Team Beta".to_string(),
                [
                    slot("Runner One", Position::RB, None),
                    slot("Runner Two", Position::RB, None),
                ],
            );
        assert!(config.validate().is_err());
    }

    #[test]
    fn main_duo_rejects_tight_ends() {
        let mut config = base_config();
        config
            .duos
            .get_mut(&AwardType::Main)
            .unwrap()
            .insert(
                "Team Beta".to_string(),
                [
                    slot("Some QB", Position::QB, None),
                    slot("Some TE", Position::TE, None),
                ],
            );
        assert!(config.validate().is_err());
    }

    #[test]
    fn next_up_duo_rejects_same_tier_and_double_qb() {
        let mut config = base_config();
        config
            .duos
            .get_mut(&AwardType::NextUp)
            .unwrap()
            .insert(
                "Team Beta".to_string(),
                [
                    slot("Rookie One", Position::WR, Some(ExperienceTier::Rookie)),
                    slot("Rookie Two", Position::RB, Some(ExperienceTier::Rookie)),
                ],
            );
        assert!(config.validate().is_err());

        let mut config = base_config();
        config
            .duos
            .get_mut(&AwardType::NextUp)
            .unwrap()
            .insert(
                "Team Beta".to_string(),
                [
                    slot("Rookie QB", Position::QB, Some(ExperienceTier::Rookie)),
                    slot("Soph QB", Position::QB, Some(ExperienceTier::Sophomore)),
                ],
            );
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_integer_week_keys() {
        let json = r#"{
            "season": "2025",
            "seasonStart": "2025-09-04T00:00:00Z",
            "duos": {
                "main": {
                    "Team Alpha": [
                        { "name": "Josh Allen", "position": "QB" },
                        { "name": "Bijan Robinson", "position": "RB" }
                    ]
                }
            },
            "byeWeeks": { "KC": 10 },
            "internationalWeeks": { "4": ["MIN", "PIT"] }
        }"#;
        let config: SeasonConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.bye_weeks.get("KC"), Some(&10));
        assert_eq!(config.international_teams(4), &["MIN".to_string(), "PIT".to_string()]);
        assert!(config.international_teams(5).is_empty());
    }

    #[test]
    fn manual_substitution_needs_substitute_id() {
        let mut config = base_config();
        config.manual_substitutions.push(SubstitutionRecord {
            team_name: "Team Alpha".to_string(),
            award_type: AwardType::Main,
            slot_index: 0,
            original_name: "Josh Allen".to_string(),
            original_position: Position::QB,
            substitute_player_id: None,
            substitute_name: None,
            substitute_position: None,
            start_week: 3,
            end_week: None,
            active: true,
            reason: "trade".to_string(),
            auto_generated: false,
        });
        assert!(config.validate().is_err());
    }
}
