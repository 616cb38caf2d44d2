//! RPC method handler for the Shelfmark JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested without stdio.
//! `handle_method` dispatches method calls to the bookmark manager, the
//! catalog client and the settings engine held by `App`.

use serde_json::{json, Map, Value};

use crate::app::App;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::services::book_identity::canonical_id_of_value;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::catalog::CoverSize;

static NULL: Value = Value::Null;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing {}", name))
}

fn limit_param(params: &Value) -> Result<Option<u32>, String> {
    match params.get("limit") {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .filter(|n| (1..=1000).contains(n))
            .map(|n| Some(n as u32))
            .ok_or_else(|| "invalid limit: expected an integer between 1 and 1000".to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmarks.getAll" => {
            let shelf = app.bookmarks.get_all().map_err(|e| e.to_string())?;
            to_json(&shelf)
        }
        "bookmarks.get" => {
            let id = str_param(params, "id")?;
            let entry = app.bookmarks.get(id).map_err(|e| e.to_string())?;
            to_json(&entry)
        }
        "bookmarks.add" => {
            // A missing book is passed through as null and rejected as invalid input.
            let book = params.get("book").unwrap_or(&NULL);
            let shelf = app.bookmarks.add(book).map_err(|e| e.to_string())?;
            to_json(&shelf)
        }
        "bookmarks.remove" => {
            let id = str_param(params, "id")?;
            let shelf = app.bookmarks.remove(id).map_err(|e| e.to_string())?;
            to_json(&shelf)
        }
        "bookmarks.update" => {
            let id = str_param(params, "id")?;
            let fields = match params.get("fields") {
                None | Some(Value::Null) => Map::new(),
                Some(Value::Object(map)) => map.clone(),
                Some(_) => return Err("invalid fields: expected an object".to_string()),
            };
            let shelf = app.bookmarks.update(id, &fields).map_err(|e| e.to_string())?;
            to_json(&shelf)
        }
        "bookmarks.isBookmarked" => {
            let id = str_param(params, "id")?;
            let bookmarked = app.bookmarks.is_bookmarked(id).map_err(|e| e.to_string())?;
            Ok(Value::Bool(bookmarked))
        }
        "bookmarks.canonicalId" => {
            let book = params.get("book").unwrap_or(&NULL);
            Ok(canonical_id_of_value(book).map_or(Value::Null, Value::String))
        }

        // ─── Catalog ───
        "catalog.search" => {
            let query = str_param(params, "query")?;
            if query.trim().is_empty() {
                return Err("invalid query: must not be empty".to_string());
            }
            let limit = limit_param(params)?;
            let docs = app.catalog.search(query, limit).await.map_err(|e| e.to_string())?;
            to_json(&docs)
        }
        "catalog.work" => {
            let key = str_param(params, "key")?;
            let work = app.catalog.work(key).await.map_err(|e| e.to_string())?;
            to_json(&work)
        }
        "catalog.subject" => {
            let name = str_param(params, "name")?;
            let limit = limit_param(params)?;
            let shelf = app.catalog.subject(name, limit).await.map_err(|e| e.to_string())?;
            to_json(&shelf)
        }
        "catalog.coverUrl" => {
            let cover_id = params
                .get("coverId")
                .and_then(Value::as_i64)
                .ok_or("missing coverId")?;
            let size = match params.get("size").and_then(Value::as_str) {
                None => CoverSize::Medium,
                Some(s) => CoverSize::parse(s).ok_or_else(|| format!("invalid size: {}", s))?,
            };
            Ok(Value::String(app.catalog.cover_url(cover_id, size)))
        }

        // ─── Settings ───
        "settings.get" => {
            let engine = app.settings();
            to_json(engine.get_settings())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            app.settings().set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            app.settings().reset().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
