//! Configuration management for Visuales.
//!
//! Configuration is read from `~/.config/visuales/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! Categories are loaded once here and never change for the process lifetime.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::Category;
use crate::fetcher::parallel::DEFAULT_WORKERS;

pub const DEFAULT_BASE_URL: &str = "https://visuales.uclv.cu";

/// Some index servers reject non-browser clients.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub http: HttpConfig,
    pub search: SearchConfig,
    pub downloads: DownloadConfig,
    pub categories: Vec<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http: HttpConfig::default(),
            search: SearchConfig::default(),
            downloads: DownloadConfig::default(),
            categories: Category::defaults(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum categories fetched at once during a search
    pub max_concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_WORKERS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Fallback download directory when none has been chosen yet
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/visuales/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("visuales").join("config.toml"))
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Visuales Configuration

# Root of the directory-listing site. Category paths are resolved against it.
base_url = "https://visuales.uclv.cu"

[http]
# Request timeout in seconds
timeout_secs = 30

# Browser-like identification; some servers reject default clients
user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"

[search]
# Maximum categories fetched at once during a search
max_concurrency = 4

[downloads]
# Default download directory (used until one is set with `visuales set-download-path`)
# directory = "/home/me/Downloads/VisualesUCLV"

[[categories]]
id = "peliculas"
name = "Películas"
url = "/Peliculas/"
icon = "🎬"

[[categories]]
id = "series"
name = "Series"
url = "/Series/"
icon = "📺"

[[categories]]
id = "documentales"
name = "Documentales"
url = "/Documentales/"
icon = "🎥"

[[categories]]
id = "recientes"
name = "Recientes"
url = "/Recientes/"
icon = "🆕"

[[categories]]
id = "cursos"
name = "Cursos"
url = "/Cursos/"
icon = "📚"

[[categories]]
id = "conferencias"
name = "Conferencias"
url = "/Conferencias/"
icon = "🎤"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
