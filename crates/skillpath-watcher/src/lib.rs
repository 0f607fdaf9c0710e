//! Seed file watching and graph hot reload

pub mod watcher;

pub use watcher::{SeedWatcher, DEFAULT_DEBOUNCE};
