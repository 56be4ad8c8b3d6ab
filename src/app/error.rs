use thiserror::Error;

use crate::config::ConfigError;
use crate::fetcher::FetchError;

#[derive(Error, Debug)]
pub enum VisualesError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("{0}")]
    Other(String),
}

impl From<ConfigError> for VisualesError {
    fn from(e: ConfigError) -> Self {
        VisualesError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VisualesError>;
