//! App Core for Shelfmark.
//!
//! Central struct holding the settings engine, the bookmark manager and the
//! catalog client. Every field is internally synchronized so the RPC layer can
//! share one `App` across tasks.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::managers::bookmark_manager::BookmarkManager;
use crate::platform;
use crate::services::catalog_client::CatalogClient;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::storage::BookmarkStore;
use crate::types::settings::AppSettings;

/// Central application struct.
pub struct App {
    pub settings_engine: Mutex<SettingsEngine>,
    pub bookmarks: BookmarkManager,
    pub catalog: CatalogClient,
}

impl App {
    /// Creates a new App.
    ///
    /// With `data_dir`, both `settings.json` and the bookmark document live in
    /// that directory. Without it, settings come from the platform config dir
    /// and the bookmark document from `storage.data_dir` or the platform data dir.
    ///
    /// Unreadable settings fall back to defaults; the bookmark document is not
    /// touched until the first bookmark operation.
    pub fn new(data_dir: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine =
            SettingsEngine::new(data_dir.map(|dir| dir.join("settings.json")));
        let settings = settings_engine.load().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load settings, using defaults");
            AppSettings::default()
        });

        let bookmarks_path = Self::bookmarks_path(data_dir, &settings);
        info!(
            settings = %settings_engine.get_config_path().display(),
            bookmarks = %bookmarks_path.display(),
            "starting shelfmark"
        );

        let catalog = CatalogClient::new(&settings.catalog)
            .map_err(|e| format!("CatalogClient init failed: {}", e))?;

        Ok(Self {
            settings_engine: Mutex::new(settings_engine),
            bookmarks: BookmarkManager::new(BookmarkStore::new(bookmarks_path)),
            catalog,
        })
    }

    /// Resolves the bookmark document path: explicit dir, then settings, then platform.
    pub fn bookmarks_path(data_dir: Option<&Path>, settings: &AppSettings) -> PathBuf {
        let dir = match (data_dir, settings.storage.data_dir.as_deref()) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) if !dir.is_empty() => PathBuf::from(dir),
            _ => platform::get_data_dir(),
        };
        dir.join(&settings.storage.bookmarks_file)
    }

    /// Locks the settings engine.
    pub fn settings(&self) -> MutexGuard<'_, SettingsEngine> {
        self.settings_engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
