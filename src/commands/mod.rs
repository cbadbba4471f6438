//! This module aggregates all the command modules for the bot.

/// Commands related to AI interactions (querying Gemini, managing its API key).
pub mod ai;
/// General purpose commands (e.g. help, register).
pub mod general;
