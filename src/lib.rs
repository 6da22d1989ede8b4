//! groupshelf: the model behind a browser-extension popup that organizes
//! saved bookmarks and live tabs into groups.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod config;
pub mod database;
pub mod managers;
pub mod platform;
pub mod services;
pub mod store;
pub mod types;
