//! This module aggregates various utility submodules used throughout the application.

/// Utilities for interacting with the application's SQLite settings store.
pub mod database;
/// Utilities for interacting with the Google Gemini API.
pub mod gemini_client;
