// Shelfmark services
// Services provide stateless or self-contained functionality: identity, settings, catalog lookups.

pub mod book_identity;
pub mod catalog_client;
pub mod settings_engine;
