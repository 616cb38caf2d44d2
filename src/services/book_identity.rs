//! Canonical identity for book-like records.
//!
//! Every "is this book already on the shelf" check goes through
//! [`canonical_id`]. A catalog key wins when present; otherwise the id is the
//! composite `title||first author||cover`. Two distinct books sharing all three
//! composite parts collide, and no case or whitespace normalization is applied.

use serde_json::Value;

use crate::types::bookmark::BookRecord;

/// Separator between the parts of a composite id.
pub const ID_SEPARATOR: &str = "||";

/// Computes the canonical id of `record`, or `None` when there is no record.
pub fn canonical_id(record: Option<&BookRecord>) -> Option<String> {
    let record = record?;

    if let Some(key) = record.key.as_deref().filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let cover = record
        .cover_i
        .as_ref()
        .map(|c| c.to_string())
        .unwrap_or_default();

    Some(
        [
            record.title.as_deref().unwrap_or(""),
            record.first_author().unwrap_or(""),
            cover.as_str(),
        ]
        .join(ID_SEPARATOR),
    )
}

/// Same as [`canonical_id`] but straight from a JSON payload.
///
/// Only `null` and non-objects yield `None`; known fields of the wrong type
/// count as missing.
pub fn canonical_id_of_value(value: &Value) -> Option<String> {
    canonical_id(BookRecord::from_value(value).as_ref())
}
