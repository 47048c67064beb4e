//! # Award Engine
//!
//! Decision core for the weekly duo awards: availability classification,
//! substitute selection, the substitution ledger, and score resolution.
//!
//! Everything here is synchronous and deterministic given a [`LeagueView`],
//! a [`ScheduleProvider`], and a seeded RNG. The fetching crates assemble
//! those inputs; the service crate decides which passes to run and persists
//! the outcome.

pub mod availability;
pub mod config;
pub mod detector;
pub mod error;
pub mod league;
pub mod ledger;
pub mod lookup;
pub mod manager;
pub mod scoring;
pub mod selector;
pub mod types;

pub use availability::{AvailabilityClassifier, ScheduleProvider};
pub use config::{ScoreCorrection, SeasonConfig};
pub use detector::{detect_unavailable, DetectionReport, UnavailableSlot};
pub use error::ConfigError;
pub use league::{LeagueView, ScoreBook, TeamRoster};
pub use ledger::{SubstitutionLedger, SubstitutionRecord};
pub use lookup::{resolve_player, GlobalSearch};
pub use manager::{LedgerManager, LedgerPasses, LedgerStats};
pub use scoring::{ScoreReport, ScoreResolver, ScoreTable, TeamScoreRows};
pub use selector::{PairingPartner, SubstituteCandidate, SubstituteSelector};
pub use types::{
    Availability, AvailabilityStatus, AwardType, ExperienceTier, NflTeam, PlatformPlayer, PlayerId,
    Position, TeamName, TrackedPlayer, Week, FIRST_WEEK, LAST_WEEK,
};
