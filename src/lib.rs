//! Shelfmark: backend of a desktop book-discovery app with a personal bookmark shelf.
//!
//! This library crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod storage;
pub mod types;
