//! Wire models for the Sleeper API.
//!
//! Only the fields the engine consumes are declared; the rest of each
//! payload is ignored. Fields the API has been seen to omit or null are
//! optional.

use std::collections::HashMap;

use serde::Deserialize;

/// League metadata. `leg` is the platform's running-week indicator.
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperLeague {
    pub league_id: String,
    pub name: String,
    pub season: String,
    pub leg: Option<u16>,
}

/// One fantasy roster. `owner_id` is null for orphaned rosters.
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperRoster {
    pub roster_id: u32,
    pub owner_id: Option<String>,
    pub players: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    pub display_name: Option<String>,
    pub username: Option<String>,
}

/// Directory entry from the full player dump. Team-defense entries carry
/// no names at all, so everything is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperPlayer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub years_exp: Option<u8>,
    pub injury_status: Option<String>,
}

/// One side of a weekly matchup.
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperMatchup {
    pub roster_id: u32,
    pub players_points: Option<HashMap<String, f64>>,
}
