//! The Gemini cog: answers free-text queries and manages the stored API key.
//!
//! Command handlers in [`crate::commands::ai`] are thin wrappers around [`GeminiCog`];
//! everything here is independent of Discord so it can be exercised directly.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::utils::database::{ConfigStore, DatabaseError};
use crate::utils::gemini_client::TextGenerator;

/// Reply sent when a query arrives before any key has been stored.
pub const KEY_NOT_SET_MESSAGE: &str = "API key is not set. Use `apikey` to set it.";
/// How long to wait for the follow-up message carrying the key.
pub const KEY_REPLY_TIMEOUT: Duration = Duration::from_secs(60);

/// Reasons a key update can fail.
#[derive(Error, Debug)]
pub enum KeyUpdateError {
    #[error("Only administrators can change the API key.")]
    NotAdministrator,

    #[error("Timed out waiting for the API key.")]
    TimedOut,

    #[error("The API key cannot be empty.")]
    EmptyKey,

    #[error("The stored API key did not match the submitted one.")]
    ReadBackMismatch,

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

/// The user asking to change the key.
#[derive(Debug, Clone)]
pub struct Requester {
    pub name: String,
    pub is_admin: bool,
}

/// Formats any failure the way it is shown in chat.
pub fn error_reply(err: impl std::fmt::Display) -> String {
    format!("An error occurred: {err}")
}

/// Shows only the last four characters of a key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("…{tail}")
}

/// Query and key-management operations, generic over the text backend.
pub struct GeminiCog<G: TextGenerator> {
    store: Arc<ConfigStore>,
    generator: G,
    reply_timeout: Duration,
}

impl<G: TextGenerator> GeminiCog<G> {
    pub fn new(store: Arc<ConfigStore>, generator: G) -> Self {
        Self {
            store,
            generator,
            reply_timeout: KEY_REPLY_TIMEOUT,
        }
    }

    /// Overrides the follow-up wait (tests use a few milliseconds).
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    pub fn reply_timeout(&self) -> Duration {
        self.reply_timeout
    }

    /// Answers `query`, always producing something to post back.
    pub async fn query(&self, query: &str) -> String {
        let api_key = match self.store.api_key() {
            Ok(Some(key)) => key,
            Ok(None) => {
                info!("Query received but no API key is configured");
                return KEY_NOT_SET_MESSAGE.to_string();
            }
            Err(e) => {
                error!("Failed to read API key: {}", e);
                return error_reply(e);
            }
        };

        debug!("Forwarding query of {} characters", query.len());
        match self.generator.generate(&api_key, query).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Query failed: {}", e);
                error_reply(e)
            }
        }
    }

    /// Stores a new API key.
    ///
    /// `inline` is the key given with the command, if any. Otherwise `follow_up` is awaited,
    /// bounded by the reply timeout; it is never polled for a non-administrator.
    /// Returns the masked key as read back from the store.
    pub async fn set_key<F>(
        &self,
        requester: &Requester,
        inline: Option<String>,
        follow_up: F,
    ) -> Result<String, KeyUpdateError>
    where
        F: Future<Output = Option<String>>,
    {
        if !requester.is_admin {
            warn!("Rejected API key update from non-administrator {}", requester.name);
            return Err(KeyUpdateError::NotAdministrator);
        }

        let submitted = match inline.filter(|k| !k.trim().is_empty()) {
            Some(key) => key,
            None => {
                debug!("Waiting up to {:?} for {} to send the key", self.reply_timeout, requester.name);
                match tokio::time::timeout(self.reply_timeout, follow_up).await {
                    Ok(Some(key)) => key,
                    // The collector gave up on its own (e.g. shard shutdown).
                    Ok(None) | Err(_) => {
                        warn!("Timed out waiting for API key from {}", requester.name);
                        return Err(KeyUpdateError::TimedOut);
                    }
                }
            }
        };

        let key = submitted.trim();
        if key.is_empty() {
            return Err(KeyUpdateError::EmptyKey);
        }

        self.store.set_api_key(key)?;
        let stored = self.store.api_key()?;
        if stored.as_deref() != Some(key) {
            error!("API key read-back did not match after update by {}", requester.name);
            return Err(KeyUpdateError::ReadBackMismatch);
        }

        info!("API key updated by {}", requester.name);
        Ok(mask_key(key))
    }
}
