use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::FileType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub url: String,
    pub name: String,
    pub file_type: FileType,
    pub added_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(url: String, name: String, file_type: FileType) -> Self {
        Self {
            url,
            name,
            file_type,
            added_at: Utc::now(),
        }
    }
}

/// A path the user opened, kept for the browsing-history view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub path: String,
    pub name: String,
    pub visited_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Pending,
    Completed,
    Failed,
}

impl DownloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadStatus::Pending => "pending",
            DownloadStatus::Completed => "completed",
            DownloadStatus::Failed => "failed",
        }
    }

    pub fn from_name(s: &str) -> Self {
        match s {
            "completed" => DownloadStatus::Completed,
            "failed" => DownloadStatus::Failed,
            _ => DownloadStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub path: String,
    pub status: DownloadStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DownloadRecord {
    pub fn new(name: String, url: String, path: String) -> Self {
        Self {
            id: 0,
            name,
            url,
            path,
            status: DownloadStatus::Pending,
            error: None,
            created_at: Utc::now(),
        }
    }
}
