//! Bookmark Manager for Shelfmark.
//!
//! Implements `BookmarkManagerTrait`, the only entry point through which UI
//! surfaces read or change the bookmark shelf. Each operation is one full
//! load → transform → save cycle over the store, run under a single mutex so
//! concurrent callers cannot lose each other's writes.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::services::book_identity::canonical_id;
use crate::storage::{BookmarkStore, BookmarkStoreTrait};
use crate::types::bookmark::{BookRecord, BookmarkCollection, BookmarkEntry};
use crate::types::errors::BookmarkError;

/// Fields `update` refuses to touch.
const IMMUTABLE_FIELDS: [&str; 2] = ["id", "addedAt"];

/// Trait defining the bookmark command surface.
pub trait BookmarkManagerTrait {
    fn get_all(&self) -> Result<BookmarkCollection, BookmarkError>;
    fn get(&self, id: &str) -> Result<Option<BookmarkEntry>, BookmarkError>;
    fn add(&self, record: &Value) -> Result<BookmarkCollection, BookmarkError>;
    fn remove(&self, id: &str) -> Result<BookmarkCollection, BookmarkError>;
    fn update(&self, id: &str, fields: &Map<String, Value>) -> Result<BookmarkCollection, BookmarkError>;
    fn is_bookmarked(&self, id: &str) -> Result<bool, BookmarkError>;
}

/// Bookmark manager owning a store behind a mutex.
pub struct BookmarkManager<S: BookmarkStoreTrait = BookmarkStore> {
    store: Mutex<S>,
}

impl<S: BookmarkStoreTrait> BookmarkManager<S> {
    /// Creates a new `BookmarkManager` that takes ownership of `store`.
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Locks the store for one whole operation.
    ///
    /// The store caches nothing between calls, so a lock poisoned by a
    /// panicking caller is still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    /// Applies a shallow field overwrite to `entry` and stamps `updatedAt`.
    ///
    /// The entry goes through its JSON form so arbitrary fields can be merged;
    /// deserializing back rejects values of the wrong type for typed fields.
    fn merge_fields(
        entry: &BookmarkEntry,
        fields: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<BookmarkEntry, BookmarkError> {
        let mut json = serde_json::to_value(entry).map_err(|e| {
            BookmarkError::StorageUnavailable(format!("Failed to serialize bookmark '{}': {}", entry.id, e))
        })?;

        // Echoing the stored value back is allowed; changing it is not.
        if let Some(field) = IMMUTABLE_FIELDS
            .iter()
            .find(|f| fields.get(**f).is_some_and(|v| json.get(**f) != Some(v)))
        {
            return Err(BookmarkError::InvalidInput(format!(
                "field '{}' cannot be updated",
                field
            )));
        }

        if let Value::Object(map) = &mut json {
            for (key, value) in fields {
                map.insert(key.clone(), value.clone());
            }
        }

        let mut merged: BookmarkEntry = serde_json::from_value(json).map_err(|e| {
            BookmarkError::InvalidInput(format!("Invalid fields for bookmark '{}': {}", entry.id, e))
        })?;
        merged.updated_at = Some(now);
        Ok(merged)
    }
}

impl BookmarkManager<BookmarkStore> {
    /// Returns the path of the backing bookmark document.
    pub fn store_path(&self) -> PathBuf {
        self.lock().path().to_path_buf()
    }
}

impl<S: BookmarkStoreTrait> BookmarkManagerTrait for BookmarkManager<S> {
    /// Returns the whole shelf, most recent activity first.
    fn get_all(&self) -> Result<BookmarkCollection, BookmarkError> {
        self.lock().load()
    }

    /// Looks up a single entry by id.
    fn get(&self, id: &str) -> Result<Option<BookmarkEntry>, BookmarkError> {
        let collection = self.lock().load()?;
        Ok(collection.into_iter().find(|b| b.id == id))
    }

    /// Upserts `record` at the front of the shelf.
    ///
    /// `record` is kept verbatim as the entry's `raw` payload.
    fn add(&self, record: &Value) -> Result<BookmarkCollection, BookmarkError> {
        let book = BookRecord::from_value(record);
        let id = canonical_id(book.as_ref()).ok_or_else(|| {
            BookmarkError::InvalidInput("cannot derive a canonical id from the record".to_string())
        })?;
        // canonical_id only yields an id for a parsed record
        let book = book.unwrap_or_default();

        let store = self.lock();
        let mut collection = store.load()?;
        let before = collection.len();
        collection.retain(|b| b.id != id);
        let replaced = collection.len() < before;

        let entry = BookmarkEntry::from_record(id.clone(), &book, record.clone(), Self::now());
        collection.insert(0, entry);
        store.save(&collection)?;

        info!(id = %id, replaced, total = collection.len(), "bookmark added");
        Ok(collection)
    }

    /// Removes the entry with `id`. Unknown ids are a no-op, not an error.
    fn remove(&self, id: &str) -> Result<BookmarkCollection, BookmarkError> {
        let store = self.lock();
        let mut collection = store.load()?;
        let before = collection.len();
        collection.retain(|b| b.id != id);
        store.save(&collection)?;

        if collection.len() < before {
            info!(id = %id, total = collection.len(), "bookmark removed");
        } else {
            debug!(id = %id, "remove of unknown bookmark");
        }
        Ok(collection)
    }

    /// Merges `fields` into the entry with `id` and moves it to the front.
    fn update(&self, id: &str, fields: &Map<String, Value>) -> Result<BookmarkCollection, BookmarkError> {
        let store = self.lock();
        let mut collection = store.load()?;
        let index = collection
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;

        let merged = Self::merge_fields(&collection[index], fields, Self::now())?;
        collection.remove(index);
        collection.insert(0, merged);
        store.save(&collection)?;

        info!(id = %id, fields = fields.len(), "bookmark updated");
        Ok(collection)
    }

    /// Returns whether an entry with `id` is on the shelf.
    fn is_bookmarked(&self, id: &str) -> Result<bool, BookmarkError> {
        let collection = self.lock().load()?;
        Ok(collection.iter().any(|b| b.id == id))
    }
}
