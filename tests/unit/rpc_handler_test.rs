//! Unit tests for the RPC handler: the methods dispatched by `handle_method`.
//!
//! These tests go through the same code path as the `shelfmark-rpc` binary,
//! with settings and bookmarks in a temporary data directory. Catalog methods
//! are only exercised up to parameter validation, so no network is needed.

use serde_json::{json, Value};
use tempfile::TempDir;

use shelfmark::app::App;
use shelfmark::rpc_handler::handle_method;

/// Create a fresh App backed by a temp data directory.
fn setup() -> (App, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let app = App::new(Some(tmp.path())).expect("Failed to init App");
    (app, tmp)
}

fn dune() -> Value {
    json!({
        "key": "/works/OL1W",
        "title": "Dune",
        "author_name": ["Frank Herbert"],
        "cover_i": 12345
    })
}

// ─── Ping / unknown ───

#[tokio::test]
async fn test_ping() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "ping", &json!({})).await.unwrap();
    assert_eq!(res, json!({"pong": true}));
}

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "nonexistent.method", &json!({})).await;
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Bookmarks ───

#[tokio::test]
async fn test_bookmark_full_scenario() {
    let (app, _tmp) = setup();

    let shelf = handle_method(&app, "bookmarks.add", &json!({"book": dune()})).await.unwrap();
    let arr = shelf.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["id"], "/works/OL1W");
    assert_eq!(arr[0]["title"], "Dune");
    assert_eq!(arr[0]["raw"], dune());

    let yes = handle_method(&app, "bookmarks.isBookmarked", &json!({"id": "/works/OL1W"})).await.unwrap();
    assert_eq!(yes, Value::Bool(true));

    let shelf = handle_method(
        &app,
        "bookmarks.update",
        &json!({"id": "/works/OL1W", "fields": {"review": "Great"}}),
    )
    .await
    .unwrap();
    assert_eq!(shelf[0]["review"], "Great");
    assert!(shelf[0]["updatedAt"].is_string());

    let shelf = handle_method(&app, "bookmarks.remove", &json!({"id": "/works/OL1W"})).await.unwrap();
    assert_eq!(shelf, json!([]));

    let all = handle_method(&app, "bookmarks.getAll", &json!({})).await.unwrap();
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_bookmark_add_without_book_is_invalid_input() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "bookmarks.add", &json!({})).await.unwrap_err();
    assert!(err.contains("Invalid bookmark input"), "got: {}", err);
}

#[tokio::test]
async fn test_bookmark_update_unknown_id() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "bookmarks.update", &json!({"id": "nope", "fields": {"review": "x"}}))
        .await
        .unwrap_err();
    assert_eq!(err, "Bookmark not found: nope");
}

#[tokio::test]
async fn test_bookmark_update_rejects_non_object_fields() {
    let (app, _tmp) = setup();
    handle_method(&app, "bookmarks.add", &json!({"book": dune()})).await.unwrap();
    let err = handle_method(&app, "bookmarks.update", &json!({"id": "/works/OL1W", "fields": "review"}))
        .await
        .unwrap_err();
    assert!(err.contains("invalid fields"));
}

#[tokio::test]
async fn test_bookmark_id_params_required() {
    let (app, _tmp) = setup();
    for method in ["bookmarks.remove", "bookmarks.update", "bookmarks.isBookmarked", "bookmarks.get"] {
        let err = handle_method(&app, method, &json!({})).await.unwrap_err();
        assert_eq!(err, "missing id", "method {}", method);
    }
}

#[tokio::test]
async fn test_bookmark_get() {
    let (app, _tmp) = setup();
    handle_method(&app, "bookmarks.add", &json!({"book": dune()})).await.unwrap();

    let entry = handle_method(&app, "bookmarks.get", &json!({"id": "/works/OL1W"})).await.unwrap();
    assert_eq!(entry["authorNames"], json!(["Frank Herbert"]));

    let missing = handle_method(&app, "bookmarks.get", &json!({"id": "other"})).await.unwrap();
    assert!(missing.is_null());
}

#[tokio::test]
async fn test_canonical_id_matches_stored_id() {
    let (app, _tmp) = setup();
    let book = json!({"title": "No Key Book", "author_name": ["X"], "cover_i": 1});

    let id = handle_method(&app, "bookmarks.canonicalId", &json!({"book": book})).await.unwrap();
    let shelf = handle_method(&app, "bookmarks.add", &json!({"book": book})).await.unwrap();

    assert_eq!(id, json!("No Key Book||X||1"));
    assert_eq!(shelf[0]["id"], id);

    let none = handle_method(&app, "bookmarks.canonicalId", &json!({})).await.unwrap();
    assert!(none.is_null());
}

#[tokio::test]
async fn test_bookmarks_land_in_data_dir() {
    let (app, tmp) = setup();
    handle_method(&app, "bookmarks.getAll", &json!({})).await.unwrap();
    let content = std::fs::read_to_string(tmp.path().join("bookmarks.json")).unwrap();
    assert_eq!(content, "[]");
}

// ─── Catalog ───

#[tokio::test]
async fn test_catalog_param_validation() {
    let (app, _tmp) = setup();
    assert_eq!(handle_method(&app, "catalog.search", &json!({})).await.unwrap_err(), "missing query");
    assert!(handle_method(&app, "catalog.search", &json!({"query": "  "})).await.unwrap_err().contains("invalid query"));
    assert!(handle_method(&app, "catalog.search", &json!({"query": "dune", "limit": 0})).await.unwrap_err().contains("invalid limit"));
    assert_eq!(handle_method(&app, "catalog.work", &json!({})).await.unwrap_err(), "missing key");
    assert!(handle_method(&app, "catalog.work", &json!({"key": "../x"})).await.unwrap_err().contains("Invalid catalog key"));
    assert_eq!(handle_method(&app, "catalog.subject", &json!({})).await.unwrap_err(), "missing name");
}

#[tokio::test]
async fn test_catalog_cover_url() {
    let (app, _tmp) = setup();
    let url = handle_method(&app, "catalog.coverUrl", &json!({"coverId": 12345})).await.unwrap();
    assert_eq!(url, json!("https://covers.openlibrary.org/b/id/12345-M.jpg"));

    let url = handle_method(&app, "catalog.coverUrl", &json!({"coverId": 1, "size": "L"})).await.unwrap();
    assert_eq!(url, json!("https://covers.openlibrary.org/b/id/1-L.jpg"));

    assert!(handle_method(&app, "catalog.coverUrl", &json!({"coverId": 1, "size": "XL"})).await.is_err());
    assert!(handle_method(&app, "catalog.coverUrl", &json!({})).await.is_err());
}

// ─── Settings ───

#[tokio::test]
async fn test_settings_get_set_reset() {
    let (app, tmp) = setup();

    let settings = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(settings["storage"]["bookmarks_file"], "bookmarks.json");

    handle_method(&app, "settings.set", &json!({"key": "catalog.search_limit", "value": 50}))
        .await
        .unwrap();
    let settings = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(settings["catalog"]["search_limit"], 50);
    assert!(tmp.path().join("settings.json").exists());

    handle_method(&app, "settings.reset", &json!({})).await.unwrap();
    let settings = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(settings["catalog"]["search_limit"], 20);
}

#[tokio::test]
async fn test_settings_set_errors() {
    let (app, _tmp) = setup();
    assert_eq!(handle_method(&app, "settings.set", &json!({"value": 1})).await.unwrap_err(), "missing key");
    assert_eq!(handle_method(&app, "settings.set", &json!({"key": "logging.level"})).await.unwrap_err(), "missing value");
    assert!(handle_method(&app, "settings.set", &json!({"key": "nope", "value": 1})).await.unwrap_err().contains("Invalid settings key"));
}
