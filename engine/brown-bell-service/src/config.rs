//! Service configuration management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Sleeper league to fetch
    pub league_id: String,

    /// Sleeper API base URL
    pub api_base_url: String,

    /// Schedule page base URL
    pub schedule_base_url: String,

    /// Path of the persisted snapshot
    pub data_file: PathBuf,

    /// Path of the season configuration (duos, byes, manual records)
    pub season_file: PathBuf,

    /// Timeout for every outbound HTTP request, in seconds
    pub http_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            league_id: "1126351965879164928".to_string(),
            api_base_url: sleeper_client::DEFAULT_BASE_URL.to_string(),
            schedule_base_url: schedule_scraper::DEFAULT_BASE_URL.to_string(),
            data_file: PathBuf::from("brown-bell-data.json"),
            season_file: PathBuf::from("brown-bell-season.json"),
            http_timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Load configuration from environment variables over the defaults
pub fn load_config() -> Result<ServiceConfig> {
    let mut config = ServiceConfig::default();

    if let Ok(league_id) = std::env::var("SLEEPER_LEAGUE_ID") {
        config.league_id = league_id;
    }

    if let Ok(base) = std::env::var("SLEEPER_API_BASE_URL") {
        config.api_base_url = base;
    }

    if let Ok(base) = std::env::var("SCHEDULE_BASE_URL") {
        config.schedule_base_url = base;
    }

    if let Ok(path) = std::env::var("BROWN_BELL_DATA_FILE") {
        config.data_file = PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("BROWN_BELL_SEASON_FILE") {
        config.season_file = PathBuf::from(path);
    }

    if let Ok(timeout) = std::env::var("BROWN_BELL_HTTP_TIMEOUT_SECS") {
        config.http_timeout_secs = timeout.parse().unwrap_or(30);
    }

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration
fn validate_config(config: &ServiceConfig) -> Result<()> {
    if config.league_id.trim().is_empty() {
        return Err(anyhow::anyhow!("league id must not be empty"));
    }

    if !config.season_file.exists() {
        return Err(anyhow::anyhow!(
            "season file not found: {:?}",
            config.season_file
        ));
    }

    if config.http_timeout_secs == 0 {
        return Err(anyhow::anyhow!("http timeout must be at least one second"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_the_public_endpoints() {
        let config = ServiceConfig::default();
        assert!(config.api_base_url.contains("sleeper"));
        assert!(config.schedule_base_url.contains("nfl"));
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn empty_league_id_is_rejected() {
        let config = ServiceConfig {
            league_id: "  ".to_string(),
            ..ServiceConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn missing_season_file_is_rejected() {
        let config = ServiceConfig {
            season_file: PathBuf::from("/definitely/not/here.json"),
            ..ServiceConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn existing_season_file_passes_validation() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = ServiceConfig {
            season_file: file.path().to_path_buf(),
            ..ServiceConfig::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
