// Shelfmark shared type definitions
// Each submodule defines types used across the application.

pub mod bookmark;
pub mod catalog;
pub mod errors;
pub mod settings;
