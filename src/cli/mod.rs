pub mod browse;
pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "visuales")]
#[command(about = "Browse and download from the Visuales UCLV directory listing", long_about = None)]
pub struct Cli {
    /// Path to an alternative config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of categories fetched at once while searching
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the configured categories
    Categories,
    /// List a remote directory
    Ls {
        /// Site path (e.g. /Series/) or absolute URL
        location: String,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search every category root by name
    Search {
        query: String,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download a single file
    Download {
        /// Site path or absolute URL of the file
        location: String,
        /// Destination directory (default: configured download path)
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },
    /// Download every file of a remote directory
    DownloadFolder {
        /// Site path or absolute URL of the directory
        location: String,
        /// Destination directory (default: configured download path)
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Show recently visited directories
    History {
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
    /// Manage the download log
    Downloads {
        #[command(subcommand)]
        action: DownloadsAction,
    },
    /// Remember the directory downloads are saved to
    SetDownloadPath { dir: PathBuf },
    /// Open a URL with the system handler (e.g. a video player)
    Open { location: String },
    /// Interactive browsing shell
    Browse,
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List favorites
    List,
    /// Add a file or directory to favorites
    Add { location: String },
    /// Remove a favorite
    Remove { location: String },
}

#[derive(Subcommand)]
pub enum DownloadsAction {
    /// List recorded downloads
    List,
    /// Remove a download record
    Remove { id: i64 },
}
