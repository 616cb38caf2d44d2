use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::bookmark::CoverRef;

/// One document from a catalog full-text search.
///
/// Serialized back in the same snake_case shape so it can be passed straight
/// to `bookmarks.add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDoc {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<CoverRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject: Vec<String>,
    #[serde(default)]
    pub has_fulltext: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebook_access: Option<String>,
}

/// Body of `/search.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default, rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<CatalogDoc>,
}

/// Descriptive metadata for a single work, from `/works/{id}.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogWork {
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    pub subjects: Vec<String>,
    pub covers: Vec<i64>,
    pub first_publish_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawWork {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub covers: Vec<i64>,
    #[serde(default)]
    pub first_publish_date: Option<String>,
}

impl From<RawWork> for CatalogWork {
    fn from(raw: RawWork) -> Self {
        // Descriptions are either a bare string or {"type": "/type/text", "value": "..."}.
        let description = raw.description.and_then(|d| match d {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("value").and_then(Value::as_str).map(str::to_string),
            _ => None,
        });
        Self {
            key: raw.key,
            title: raw.title,
            description,
            subjects: raw.subjects,
            // The catalog uses -1 as a "no cover" placeholder.
            covers: raw.covers.into_iter().filter(|c| *c > 0).collect(),
            first_publish_date: raw.first_publish_date,
        }
    }
}

/// Author reference inside a subject listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAuthor {
    #[serde(default)]
    pub key: Option<String>,
    pub name: String,
}

/// One work on a subject shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectWork {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<SubjectAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u32>,
}

/// Body of `/subjects/{slug}.json`: a category shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectShelf {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub work_count: u64,
    #[serde(default)]
    pub works: Vec<SubjectWork>,
}

/// Cover image sizes offered by the cover service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverSize {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
}

impl CoverSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }

    /// Parses `S`/`M`/`L` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "S" => Some(CoverSize::Small),
            "M" => Some(CoverSize::Medium),
            "L" => Some(CoverSize::Large),
            _ => None,
        }
    }
}
