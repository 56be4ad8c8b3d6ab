pub mod sqlite;

use crate::app::Result;
use crate::domain::{DownloadRecord, DownloadStatus, Favorite, VisitRecord};

pub use sqlite::SqliteStore;

/// Local persistence for favorites, browsing history, download records and
/// small settings values.
pub trait Store {
    // Favorites
    /// Returns `false` when the URL was already a favorite.
    fn add_favorite(&self, favorite: &Favorite) -> Result<bool>;
    fn remove_favorite(&self, url: &str) -> Result<bool>;
    fn is_favorite(&self, url: &str) -> Result<bool>;
    fn favorites(&self) -> Result<Vec<Favorite>>;

    // Browsing history
    fn record_visit(&self, path: &str, name: &str) -> Result<()>;
    /// Most recent first.
    fn recent_visits(&self, limit: usize) -> Result<Vec<VisitRecord>>;

    // Downloads
    fn add_download(&self, record: &DownloadRecord) -> Result<i64>;
    fn set_download_status(&self, id: i64, status: DownloadStatus, error: Option<&str>) -> Result<()>;
    fn downloads(&self) -> Result<Vec<DownloadRecord>>;
    fn remove_download(&self, id: i64) -> Result<bool>;
    /// Records not yet completed.
    fn active_download_count(&self) -> Result<i64>;

    // Settings
    fn get_setting(&self, key: &str) -> Result<Option<String>>;
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}
