//! Sheets Dashboard core
//!
//! Client-side state controller for browsing spreadsheets exposed by the
//! dashboard backend: a paginated, searchable listing with per-sheet
//! preview refresh, plus a lazily-populated cache of each spreadsheet's
//! inner tabs.
//!
//! All gateway traffic flows through the background API service
//! ([`service::spawn_api_service`]); the [`listing::ListingController`] and
//! [`cache::TabCache`] enqueue requests and [`handlers::handle_api_response`]
//! applies the results.

pub mod api;
pub mod cache;
pub mod config;
pub mod handlers;
pub mod listing;
pub mod logic;
pub mod service;
pub mod session;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for debug logging, set once at startup from --debug.
pub static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

/// Platform-specific debug log path
pub fn debug_log_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("sheetdash-debug.log");
    path
}

pub fn log_debug(msg: &str) {
    // Only log if debug mode is enabled
    if !DEBUG_MODE.load(Ordering::Relaxed) {
        return;
    }

    use std::fs::OpenOptions;
    use std::io::Write;
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(debug_log_path())
    {
        let _ = writeln!(file, "{}", msg);
    }
}
