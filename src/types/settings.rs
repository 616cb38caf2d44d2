use serde::{Deserialize, Serialize};

/// Top-level application settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub catalog: CatalogSettings,
    pub logging: LoggingSettings,
}

/// Where the bookmark shelf lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Overrides the platform data directory when set.
    pub data_dir: Option<String>,
    pub bookmarks_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            bookmarks_file: "bookmarks.json".to_string(),
        }
    }
}

/// Book catalog endpoints and request limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSettings {
    pub base_url: String,
    pub covers_url: String,
    pub timeout_secs: u64,
    pub search_limit: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            covers_url: "https://covers.openlibrary.org".to_string(),
            timeout_secs: 10,
            search_limit: 20,
        }
    }
}

/// Log filter used when `RUST_LOG` is not set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
