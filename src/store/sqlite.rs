use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, VisualesError};
use crate::domain::{DownloadRecord, DownloadStatus, Favorite, FileType, VisitRecord};
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| VisualesError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            VisualesError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn datetime_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        Ok(row
            .get::<_, String>(idx)
            .ok()
            .and_then(|s| Self::parse_datetime(&s))
            .unwrap_or_else(Utc::now))
    }
}

impl Store for SqliteStore {
    fn add_favorite(&self, favorite: &Favorite) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO favorites (url, name, file_type, added_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                favorite.url,
                favorite.name,
                favorite.file_type.as_str(),
                favorite.added_at.to_rfc3339()
            ],
        )?;
        Ok(inserted > 0)
    }

    fn remove_favorite(&self, url: &str) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM favorites WHERE url = ?1", params![url])?;
        Ok(removed > 0)
    }

    fn is_favorite(&self, url: &str) -> Result<bool> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM favorites WHERE url = ?1",
                params![url],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn favorites(&self) -> Result<Vec<Favorite>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT url, name, file_type, added_at FROM favorites ORDER BY id")?;

        let favorites = stmt
            .query_map([], |row| {
                Ok(Favorite {
                    url: row.get(0)?,
                    name: row.get(1)?,
                    file_type: FileType::from_name(&row.get::<_, String>(2)?),
                    added_at: Self::datetime_column(row, 3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(favorites)
    }

    fn record_visit(&self, path: &str, name: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO visits (path, name, visited_at) VALUES (?1, ?2, ?3)",
            params![path, name, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn recent_visits(&self, limit: usize) -> Result<Vec<VisitRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT path, name, visited_at FROM visits ORDER BY id DESC LIMIT ?1",
        )?;

        let visits = stmt
            .query_map(params![limit as i64], |row| {
                Ok(VisitRecord {
                    path: row.get(0)?,
                    name: row.get(1)?,
                    visited_at: Self::datetime_column(row, 2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(visits)
    }

    fn add_download(&self, record: &DownloadRecord) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO downloads (name, url, path, status, error, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.name,
                record.url,
                record.path,
                record.status.as_str(),
                record.error,
                record.created_at.to_rfc3339()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn set_download_status(&self, id: i64, status: DownloadStatus, error: Option<&str>) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE downloads SET status = ?1, error = ?2 WHERE id = ?3",
            params![status.as_str(), error, id],
        )?;
        Ok(())
    }

    fn downloads(&self) -> Result<Vec<DownloadRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, url, path, status, error, created_at FROM downloads ORDER BY id",
        )?;

        let downloads = stmt
            .query_map([], |row| {
                Ok(DownloadRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    url: row.get(2)?,
                    path: row.get(3)?,
                    status: DownloadStatus::from_name(&row.get::<_, String>(4)?),
                    error: row.get(5)?,
                    created_at: Self::datetime_column(row, 6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(downloads)
    }

    fn remove_download(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM downloads WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn active_download_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM downloads WHERE status != 'completed'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
