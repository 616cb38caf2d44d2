//! File-backed bookmark store.
//!
//! Owns the on-disk document. Every call reads or writes the whole collection;
//! callers serialize load-then-save cycles themselves.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::types::bookmark::{BookmarkCollection, BookmarkEntry};
use crate::types::errors::BookmarkError;

/// Content written when the storage location is first materialized.
pub const EMPTY_DOCUMENT: &str = "[]";

/// Trait defining whole-collection persistence for bookmarks.
pub trait BookmarkStoreTrait: Send {
    fn load(&self) -> Result<BookmarkCollection, BookmarkError>;
    fn save(&self, collection: &[BookmarkEntry]) -> Result<(), BookmarkError>;
}

/// Bookmark store persisting the collection as a JSON file.
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    path: PathBuf,
}

impl BookmarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the bookmark document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<(), BookmarkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                BookmarkError::StorageUnavailable(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Writes the empty document to a never-used storage location.
    fn bootstrap(&self) -> Result<(), BookmarkError> {
        self.ensure_parent_dir()?;
        fs::write(&self.path, EMPTY_DOCUMENT).map_err(|e| {
            BookmarkError::StorageUnavailable(format!(
                "Failed to create {}: {}",
                self.path.display(),
                e
            ))
        })?;
        info!(path = %self.path.display(), "initialized empty bookmark store");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "bookmarks.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BookmarkStoreTrait for BookmarkStore {
    /// Loads the full collection.
    ///
    /// A missing file is bootstrapped to `[]` and read as empty. A file that
    /// exists but does not parse is reported as corrupt and left untouched.
    fn load(&self) -> Result<BookmarkCollection, BookmarkError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.bootstrap()?;
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!(path = %self.path.display(), error = %e, "bookmark store is not valid UTF-8");
                return Err(BookmarkError::CorruptState(format!(
                    "{} is not valid UTF-8: {}",
                    self.path.display(),
                    e
                )));
            }
            Err(e) => {
                return Err(BookmarkError::StorageUnavailable(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let collection: BookmarkCollection = serde_json::from_str(&content).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "bookmark store failed to parse");
            BookmarkError::CorruptState(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), count = collection.len(), "loaded bookmarks");
        Ok(collection)
    }

    /// Replaces the document with `collection`.
    ///
    /// The JSON is written to a sibling `.tmp` file first and renamed over the
    /// document, so an interrupted write leaves the previous version in place.
    fn save(&self, collection: &[BookmarkEntry]) -> Result<(), BookmarkError> {
        self.ensure_parent_dir()?;

        let json = serde_json::to_string_pretty(collection).map_err(|e| {
            BookmarkError::StorageUnavailable(format!("Failed to serialize bookmarks: {}", e))
        })?;

        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(BookmarkError::StorageUnavailable(format!(
                "Failed to write {}: {}",
                tmp.display(),
                e
            )));
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(BookmarkError::StorageUnavailable(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        debug!(path = %self.path.display(), count = collection.len(), "saved bookmarks");
        Ok(())
    }
}
