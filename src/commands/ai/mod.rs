//! This module contains the commands that talk to Google Gemini and manage its API key.

/// Submodule defining the `apikey` command.
pub mod apikey;
/// Submodule defining the `ai` query command.
pub mod query;

use crate::CommandResult;
use crate::Context;

/// The maximum character length allowed for a single Discord message.
const MAX_MESSAGE_LENGTH: usize = 2000;

/// Splits `text` into pieces of at most `max_chars` characters, never cutting a character in half.
pub fn split_message(text: &str, max_chars: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(idx, _)| idx);
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Sends a potentially long response string by splitting it into chunks
/// that respect Discord's message length limit.
pub async fn chunk_response<S: AsRef<str>>(ctx: Context<'_>, response: S) -> CommandResult {
    for chunk in split_message(response.as_ref(), MAX_MESSAGE_LENGTH) {
        ctx.say(chunk).await?;
    }

    Ok(())
}
