use thiserror::Error;

// === BookmarkError ===

/// Errors surfaced by the bookmark store and the bookmark command boundary.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// No canonical id could be derived, or a patch was not applicable.
    #[error("Invalid bookmark input: {0}")]
    InvalidInput(String),
    /// Bookmark with the given ID was not found.
    #[error("Bookmark not found: {0}")]
    NotFound(String),
    /// The storage location could not be created, read or written.
    #[error("Bookmark storage unavailable: {0}")]
    StorageUnavailable(String),
    /// The persisted document exists but is not a valid bookmark collection.
    #[error("Bookmark storage corrupt: {0}")]
    CorruptState(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === CatalogError ===

/// Errors related to book catalog lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The work key or subject name cannot be used in a catalog URL.
    #[error("Invalid catalog key: {0}")]
    InvalidKey(String),
    /// The request could not be sent or the response body could not be read.
    #[error("Catalog network error: {0}")]
    NetworkError(String),
    /// The catalog answered with a non-success status.
    #[error("Catalog HTTP status {status}: {url}")]
    HttpStatus { status: u16, url: String },
    /// The response body was not the expected JSON shape.
    #[error("Catalog parse error: {0}")]
    ParseError(String),
}
