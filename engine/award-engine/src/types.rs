//! Shared vocabulary for the award engine.
//!
//! Everything downstream of the fetchers speaks in these types: award
//! identities, positions, experience tiers, and the availability verdicts
//! produced by the classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// NFL week number, 1 through 18.
pub type Week = u16;

/// Sleeper player identifier (numeric string on the wire).
pub type PlayerId = String;

/// Fantasy team display name, the key used throughout the season config.
pub type TeamName = String;

/// NFL franchise abbreviation, e.g. "BUF".
pub type NflTeam = String;

pub const FIRST_WEEK: Week = 1;
pub const LAST_WEEK: Week = 18;

/// The two awards the engine tracks. Each award follows one duo of
/// players per fantasy team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardType {
    /// Open to veterans, pairs drawn from QB/RB/WR.
    Main,
    /// Rookie + sophomore pairing.
    NextUp,
}

impl AwardType {
    /// Both awards, in the order passes iterate them.
    pub const ALL: [AwardType; 2] = [AwardType::Main, AwardType::NextUp];

    pub fn other(self) -> AwardType {
        match self {
            AwardType::Main => AwardType::NextUp,
            AwardType::NextUp => AwardType::Main,
        }
    }
}

impl fmt::Display for AwardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AwardType::Main => write!(f, "main"),
            AwardType::NextUp => write!(f, "nextup"),
        }
    }
}

/// Positions the engine recognizes. Anything else on a platform roster
/// (DEF, DL, IDP slots) is invisible to selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
}

impl Position {
    /// Parse a platform position string. Case-insensitive, returns `None`
    /// for positions the awards never touch.
    pub fn parse(raw: &str) -> Option<Position> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            "K" => Some(Position::K),
            _ => None,
        }
    }

    /// Whether the position may appear in a Main award pairing.
    pub fn main_eligible(self) -> bool {
        matches!(self, Position::QB | Position::RB | Position::WR)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
        };
        write!(f, "{label}")
    }
}

/// Experience tier for the Next-Up award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceTier {
    Rookie,
    Sophomore,
}

impl ExperienceTier {
    /// Tier for a player's accrued seasons: 0 is a rookie, 1 a sophomore,
    /// anything beyond is out of Next-Up range.
    pub fn from_years_exp(years: u8) -> Option<ExperienceTier> {
        match years {
            0 => Some(ExperienceTier::Rookie),
            1 => Some(ExperienceTier::Sophomore),
            _ => None,
        }
    }

    pub fn opposite(self) -> ExperienceTier {
        match self {
            ExperienceTier::Rookie => ExperienceTier::Sophomore,
            ExperienceTier::Sophomore => ExperienceTier::Rookie,
        }
    }
}

impl fmt::Display for ExperienceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceTier::Rookie => write!(f, "rookie"),
            ExperienceTier::Sophomore => write!(f, "sophomore"),
        }
    }
}

/// One tracked slot of a duo as declared in the season config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPlayer {
    pub name: String,
    pub position: Position,
    /// Required for Next-Up duos, absent for Main.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceTier>,
}

/// A player as the platform describes them, after the wire models have
/// been normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformPlayer {
    pub id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<Position>,
    pub team: Option<NflTeam>,
    pub years_exp: Option<u8>,
    /// Raw injury designation string, e.g. "Out", "IR", "Questionable".
    pub injury_status: Option<String>,
}

impl PlatformPlayer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Next-Up tier implied by accrued seasons. Missing experience data is
    /// treated as zero seasons, matching how the platform reports rookies.
    pub fn experience_tier(&self) -> Option<ExperienceTier> {
        ExperienceTier::from_years_exp(self.years_exp.unwrap_or(0))
    }
}

/// Availability verdict for one player in one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Healthy,
    Questionable,
    Out,
    Doubtful,
    SeasonEnding,
    Bye,
}

impl AvailabilityStatus {
    /// Whether this status alone justifies installing a substitute.
    /// Questionable players are expected to play and are never replaced.
    pub fn needs_substitute(self) -> bool {
        matches!(
            self,
            AvailabilityStatus::Out
                | AvailabilityStatus::Doubtful
                | AvailabilityStatus::SeasonEnding
                | AvailabilityStatus::Bye
        )
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AvailabilityStatus::Healthy => "healthy",
            AvailabilityStatus::Questionable => "questionable",
            AvailabilityStatus::Out => "out",
            AvailabilityStatus::Doubtful => "doubtful",
            AvailabilityStatus::SeasonEnding => "season_ending",
            AvailabilityStatus::Bye => "bye",
        };
        write!(f, "{label}")
    }
}

/// Full availability picture: the lock flag and the status behind it.
/// A locked player is never substituted regardless of status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Availability {
    pub locked: bool,
    pub status: AvailabilityStatus,
}

impl Availability {
    pub fn substitutable(&self) -> bool {
        !self.locked && self.status.needs_substitute()
    }
}
