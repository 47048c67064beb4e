//! Async client for the Sleeper fantasy platform.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::SleeperError;
use crate::models::{SleeperLeague, SleeperMatchup, SleeperPlayer, SleeperRoster, SleeperUser};

pub const DEFAULT_BASE_URL: &str = "https://api.sleeper.app/v1";

/// Sleeper API client. All endpoints are unauthenticated reads.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    base_url: String,
    client: reqwest::Client,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SleeperError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SleeperError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(SleeperClient {
            base_url: base_url.into(),
            client,
        })
    }

    pub async fn get_league(&self, league_id: &str) -> Result<SleeperLeague, SleeperError> {
        self.get_json(format!("{}/league/{league_id}", self.base_url)).await
    }

    pub async fn get_rosters(&self, league_id: &str) -> Result<Vec<SleeperRoster>, SleeperError> {
        self.get_json(format!("{}/league/{league_id}/rosters", self.base_url)).await
    }

    pub async fn get_users(&self, league_id: &str) -> Result<Vec<SleeperUser>, SleeperError> {
        self.get_json(format!("{}/league/{league_id}/users", self.base_url)).await
    }

    /// The full NFL player directory. Large payload, fetch once per run.
    pub async fn get_players(&self) -> Result<BTreeMap<String, SleeperPlayer>, SleeperError> {
        self.get_json(format!("{}/players/nfl", self.base_url)).await
    }

    /// Per-player fantasy points for one week, flattened across both sides
    /// of every matchup.
    pub async fn get_week_scores(
        &self,
        league_id: &str,
        week: u16,
    ) -> Result<BTreeMap<String, f64>, SleeperError> {
        let url = format!("{}/league/{league_id}/matchups/{week}", self.base_url);
        let matchups: Vec<SleeperMatchup> = self.get_json(url).await?;
        let scores = flatten_matchups(&matchups);
        info!(week, players = scores.len(), "fetched weekly scores");
        Ok(scores)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, SleeperError> {
        debug!(%url, "fetching");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SleeperError::Api { url, status });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| SleeperError::Json { url, source })
    }
}

fn flatten_matchups(matchups: &[SleeperMatchup]) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();
    for matchup in matchups {
        let Some(points) = &matchup.players_points else {
            continue;
        };
        for (player_id, value) in points {
            scores.insert(player_id.clone(), *value);
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn matchup(roster_id: u32, points: &[(&str, f64)]) -> SleeperMatchup {
        SleeperMatchup {
            roster_id,
            players_points: Some(
                points.iter().map(|(id, p)| (id.to_string(), *p)).collect::<HashMap<_, _>>(),
            ),
        }
    }

    #[test]
    fn flatten_merges_both_sides() {
        let matchups = vec![
            matchup(1, &[("100", 12.3), ("101", 0.0)]),
            matchup(2, &[("200", 7.9)]),
        ];
        let scores = flatten_matchups(&matchups);
        assert_eq!(scores.len(), 3);
        assert_eq!(scores.get("100"), Some(&12.3));
        assert_eq!(scores.get("200"), Some(&7.9));
    }

    #[test]
    fn flatten_skips_missing_point_maps() {
        let matchups = vec![
            SleeperMatchup {
                roster_id: 1,
                players_points: None,
            },
            matchup(2, &[("300", 4.5)]),
        ];
        let scores = flatten_matchups(&matchups);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("300"), Some(&4.5));
    }
}
