//! Error type for schedule fetching and parsing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("schedule page unusable: {0}")]
    Parse(String),
}
