pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::domain::ListingEntry;

pub use http_fetcher::HttpFetcher;
pub use parallel::ParallelFetcher;

/// Why a directory could not be listed. The `Display` text is meant to be
/// shown to the user in place of the listing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Invalid URL {0}")]
    InvalidUrl(String),

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Fetch task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        if e.is_timeout() {
            FetchError::Timeout(url)
        } else if let Some(status) = e.status() {
            FetchError::Status {
                status: status.as_u16(),
                url,
            }
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// A parsed directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// The URL the listing was fetched from; entry URLs are resolved against it.
    pub url: Url,
    pub items: Vec<ListingEntry>,
}

/// The only network capability the navigator and search depend on.
///
/// Implementations return failures as values and must be safe to call
/// concurrently for different URLs.
#[async_trait]
pub trait DirectoryFetcher {
    async fn fetch_directory(&self, url: &Url) -> Result<Listing, FetchError>;
}
