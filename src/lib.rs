//! # Visuales
//!
//! A terminal client for the Visuales UCLV media server, a plain Apache
//! style directory index of films, series, courses and software.
//!
//! ## Architecture
//!
//! ```text
//! HTTP → Listing parser → Navigator / Search → CLI
//!                                   ↘ Downloads → Store
//! ```
//!
//! - [`fetcher`]: HTTP retrieval of directory pages, one or many at a time
//! - [`listing`]: Turns an index page into typed entries
//! - [`navigator`]: Back/forward/up browsing state
//! - [`store`]: SQLite persistence for favorites, visits and downloads
//!
//! ## Quick Start
//!
//! ```bash
//! # Show the categories
//! visuales categories
//!
//! # List a directory
//! visuales ls /Series/
//!
//! # Search every category
//! visuales search "breaking bad"
//!
//! # Interactive shell
//! visuales browse
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config,
/// store, fetcher and downloader.
pub mod app;

/// Command-line interface using clap, plus the interactive `browse` shell.
pub mod cli;

/// Configuration loaded from `~/.config/visuales/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`ListingEntry`](domain::ListingEntry): One row of a directory page
/// - [`Category`](domain::Category): A top-level section of the site
/// - [`Favorite`](domain::Favorite), [`DownloadRecord`](domain::DownloadRecord): Persisted records
pub mod domain;

/// File downloads with progress events.
///
/// - [`DownloadService`](download::DownloadService): Trait for download backends
/// - [`HttpDownloader`](download::HttpDownloader): reqwest-based implementation
pub mod download;

/// HTTP fetching of directory pages.
///
/// - [`DirectoryFetcher`](fetcher::DirectoryFetcher): Async trait for directory fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent fetching with semaphore
pub mod fetcher;

/// Directory page parsing and file classification.
pub mod listing;

/// Browsing state machine with history and breadcrumbs.
pub mod navigator;

/// Fan-out name search over the category roots.
pub mod search;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

#[cfg(test)]
mod test_support;
