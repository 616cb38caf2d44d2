//! Shelfmark storage layer.
//!
//! The bookmark shelf is a single pretty-printed JSON array on disk.
//!
//! # Usage
//!
//! ```no_run
//! use shelfmark::storage::{BookmarkStore, BookmarkStoreTrait};
//!
//! let store = BookmarkStore::new("/tmp/shelfmark/bookmarks.json");
//!
//! // First access creates the file with an empty shelf
//! let shelf = store.load().expect("failed to load bookmarks");
//! store.save(&shelf).expect("failed to save bookmarks");
//! ```

pub mod bookmark_store;

pub use bookmark_store::{BookmarkStore, BookmarkStoreTrait};
