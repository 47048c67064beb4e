//! Error type for Sleeper API calls.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SleeperError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered {status}")]
    Api {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("unexpected payload from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
