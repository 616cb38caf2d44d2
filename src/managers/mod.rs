// Shelfmark state managers
// Managers own stateful operations over persisted user data.

pub mod bookmark_manager;
