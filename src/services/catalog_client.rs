//! Book catalog client for Shelfmark.
//!
//! Read-only lookups against the Open Library API: free-text search, work
//! detail, subject shelves and cover URLs. Results are optional enrichment for
//! the UI; bookmark operations never wait on them.

use std::time::Duration;

use tracing::{debug, warn};

use crate::types::catalog::{CatalogDoc, CatalogWork, CoverSize, RawWork, SearchResponse, SubjectShelf};
use crate::types::errors::CatalogError;
use crate::types::settings::CatalogSettings;

/// Async client for the public book catalog.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    covers_url: String,
    search_limit: u32,
}

impl CatalogClient {
    /// Builds a client from the `catalog` settings section.
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("shelfmark/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            covers_url: settings.covers_url.trim_end_matches('/').to_string(),
            search_limit: settings.search_limit,
        })
    }

    /// Full-text search by title, author or free text.
    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<CatalogDoc>, CatalogError> {
        let limit = limit.unwrap_or(self.search_limit).to_string();
        let url = format!("{}/search.json", self.base_url);
        let body = self.get_text(&url, &[("q", query), ("limit", limit.as_str())]).await?;
        let response = parse_search(&body)?;
        debug!(query, found = response.num_found, returned = response.docs.len(), "catalog search");
        Ok(response.docs)
    }

    /// Fetches the detail record of a work, by `OL…W` id or `/works/OL…W` key.
    pub async fn work(&self, key: &str) -> Result<CatalogWork, CatalogError> {
        let url = format!("{}{}.json", self.base_url, work_path(key)?);
        let body = self.get_text(&url, &[]).await?;
        parse_work(&body)
    }

    /// Fetches the works filed under a subject, e.g. `"science fiction"`.
    pub async fn subject(&self, name: &str, limit: Option<u32>) -> Result<SubjectShelf, CatalogError> {
        let limit = limit.unwrap_or(self.search_limit).to_string();
        let url = format!("{}/subjects/{}.json", self.base_url, subject_slug(name)?);
        let body = self.get_text(&url, &[("limit", limit.as_str())]).await?;
        parse_subject(&body)
    }

    /// Returns the image URL for a cover id.
    pub fn cover_url(&self, cover_id: i64, size: CoverSize) -> String {
        format!("{}/b/id/{}-{}.jpg", self.covers_url, cover_id, size.as_str())
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, CatalogError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "catalog request failed");
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))
    }
}

/// Normalizes a work key to its `/works/{id}` path.
///
/// Only the bare alphanumeric id is allowed through, so a key can never
/// escape the `/works/` prefix.
pub fn work_path(key: &str) -> Result<String, CatalogError> {
    let id = key.trim().trim_start_matches("/works/");
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CatalogError::InvalidKey(key.to_string()));
    }
    Ok(format!("/works/{}", id))
}

/// Turns a subject name into the catalog's slug form: lowercase, `_` for spaces.
pub fn subject_slug(name: &str) -> Result<String, CatalogError> {
    let slug = name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() || !slug.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(CatalogError::InvalidKey(name.to_string()));
    }
    Ok(slug)
}

pub fn parse_search(body: &str) -> Result<SearchResponse, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::ParseError(e.to_string()))
}

pub fn parse_work(body: &str) -> Result<CatalogWork, CatalogError> {
    let raw: RawWork = serde_json::from_str(body).map_err(|e| CatalogError::ParseError(e.to_string()))?;
    Ok(raw.into())
}

pub fn parse_subject(body: &str) -> Result<SubjectShelf, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::ParseError(e.to_string()))
}
