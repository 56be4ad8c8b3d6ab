use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::app::error::{Result, VisualesError};
use crate::config::Config;
use crate::download::HttpDownloader;
use crate::fetcher::{DirectoryFetcher, HttpFetcher, ParallelFetcher};
use crate::navigator::Navigator;
use crate::search::SearchAggregator;
use crate::store::sqlite::SqliteStore;
use crate::store::Store;

/// Settings key holding the user's chosen download directory.
pub const DOWNLOAD_PATH_KEY: &str = "download_path";

pub struct AppContext {
    pub config: Config,
    pub base_url: Url,
    pub store: Arc<SqliteStore>,
    pub fetcher: Arc<dyn DirectoryFetcher + Send + Sync>,
    pub downloader: Arc<HttpDownloader>,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let fetcher: Arc<dyn DirectoryFetcher + Send + Sync> =
            Arc::new(HttpFetcher::new(&config.http)?);
        let downloader = Arc::new(HttpDownloader::new(&config.http)?);

        Ok(Self {
            config,
            base_url,
            store,
            fetcher,
            downloader,
        })
    }

    pub fn search_aggregator(&self) -> SearchAggregator {
        let parallel =
            ParallelFetcher::with_workers(self.fetcher.clone(), self.config.search.max_concurrency);
        SearchAggregator::new(self.base_url.clone(), parallel)
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(
            self.base_url.clone(),
            self.fetcher.clone(),
            self.config.categories.clone(),
            self.search_aggregator(),
        )
    }

    /// Resolve a user-supplied location: absolute URLs pass through, anything
    /// else is a path relative to the site root.
    pub fn resolve(&self, location: &str) -> Result<Url> {
        Ok(self.base_url.join(location)?)
    }

    /// Effective download directory: stored choice, then the configured
    /// default, then `<Downloads>/VisualesUCLV`.
    pub fn download_dir(&self) -> Result<PathBuf> {
        if let Some(path) = self.store.get_setting(DOWNLOAD_PATH_KEY)? {
            return Ok(PathBuf::from(path));
        }
        if let Some(dir) = &self.config.downloads.directory {
            return Ok(dir.clone());
        }
        let downloads = dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
            .ok_or_else(|| VisualesError::Config("Could not find a download directory".into()))?;
        Ok(downloads.join("VisualesUCLV"))
    }

    pub fn set_download_dir(&self, dir: &std::path::Path) -> Result<()> {
        self.store
            .set_setting(DOWNLOAD_PATH_KEY, &dir.to_string_lossy())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| VisualesError::Config("Could not find data directory".into()))?;
        let visuales_dir = data_dir.join("visuales");
        std::fs::create_dir_all(&visuales_dir)?;
        Ok(visuales_dir.join("visuales.db"))
    }
}
