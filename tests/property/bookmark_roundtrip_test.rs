//! Property-based tests for bookmark document round-trips.
//!
//! Any collection written by `save` must come back from `load` deep-equal,
//! including the opaque `raw` payload and merged extra fields.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use shelfmark::storage::{BookmarkStore, BookmarkStoreTrait};
use shelfmark::types::bookmark::{BookmarkEntry, CoverRef};
use tempfile::TempDir;

fn arb_time() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

fn arb_cover() -> impl Strategy<Value = Option<CoverRef>> {
    proptest::option::of(prop_oneof![
        (1i64..100_000_000).prop_map(CoverRef::Id),
        "OL[0-9]{1,8}M".prop_map(CoverRef::Key),
    ])
}

/// Leaf-level JSON values for `raw` and extra fields.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[ -~]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::btree_map("[a-z_]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_extra() -> impl Strategy<Value = Map<String, Value>> {
    // Prefixed so they never shadow a typed field.
    proptest::collection::btree_map("x_[a-z]{1,6}", arb_json(), 0..3)
        .prop_map(|m| m.into_iter().collect())
}

fn arb_entry() -> impl Strategy<Value = BookmarkEntry> {
    (
        "[ -~]{1,20}",
        "[ -~]{0,20}",
        proptest::collection::vec("[a-zA-Z .]{1,15}", 0..3),
        arb_cover(),
        proptest::option::of("/works/OL[0-9]{1,6}W"),
        "\\PC{0,40}",
        arb_time(),
        proptest::option::of(arb_time()),
        arb_json(),
        arb_extra(),
    )
        .prop_map(
            |(id, title, author_names, cover_image_id, catalog_key, review, added_at, updated_at, raw, extra)| {
                BookmarkEntry {
                    id,
                    title,
                    author_names,
                    cover_image_id,
                    catalog_key,
                    review,
                    added_at,
                    updated_at,
                    raw,
                    extra,
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn save_then_load_is_identity(shelf in proptest::collection::vec(arb_entry(), 0..6)) {
        let dir = TempDir::new().unwrap();
        let store = BookmarkStore::new(dir.path().join("bookmarks.json"));

        store.save(&shelf).unwrap();
        let loaded = store.load().unwrap();

        prop_assert_eq!(loaded, shelf);
    }
}
