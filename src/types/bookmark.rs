use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reference to a cover image in the catalog's cover service.
///
/// Search results carry a numeric `cover_i`; some detail payloads carry the
/// id as a string instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoverRef {
    Id(i64),
    Key(String),
}

impl fmt::Display for CoverRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverRef::Id(id) => write!(f, "{}", id),
            CoverRef::Key(key) => f.write_str(key),
        }
    }
}

/// Typed view of a book-like payload handed in by a UI surface.
///
/// Field names follow the catalog's search documents. Everything else in the
/// payload is ignored here and kept verbatim in [`BookmarkEntry::raw`]. A
/// known field holding the wrong JSON type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub author_name: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cover_i: Option<CoverRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub review: Option<String>,
}

impl BookRecord {
    /// Reads the typed fields out of an arbitrary JSON payload.
    ///
    /// Returns `None` for `null` and for anything that is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn first_author(&self) -> Option<&str> {
        self.author_name.first().map(String::as_str)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, Vec<String>>(deserializer)?.unwrap_or_default())
}

/// One saved book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_id: Option<CoverRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_key: Option<String>,
    #[serde(default)]
    pub review: String,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub raw: Value,
    /// Fields merged in by `update` that have no typed slot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookmarkEntry {
    /// Builds a fresh entry for `record`, keeping `raw` as the caller's payload.
    pub fn from_record(id: String, record: &BookRecord, raw: Value, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: record.title.clone().unwrap_or_default(),
            author_names: record.author_name.clone(),
            cover_image_id: record.cover_i.clone(),
            catalog_key: record.key.clone().filter(|k| !k.is_empty()),
            review: record.review.clone().unwrap_or_default(),
            added_at,
            updated_at: None,
            raw,
            extra: Map::new(),
        }
    }
}

/// Ordered bookmarks, most recent activity first.
pub type BookmarkCollection = Vec<BookmarkEntry>;
