//! # Sleeper Client
//!
//! Thin async client for the Sleeper fantasy platform's read-only API, plus
//! the calendar arithmetic for deriving the running NFL week.

pub mod client;
pub mod error;
pub mod models;
pub mod week;

pub use client::{SleeperClient, DEFAULT_BASE_URL};
pub use error::SleeperError;
pub use models::{SleeperLeague, SleeperMatchup, SleeperPlayer, SleeperRoster, SleeperUser};
pub use week::current_week;
