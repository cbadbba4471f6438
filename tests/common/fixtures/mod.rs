//! Test fixtures for the Gemini Discord bot
//! This module contains sample data used in tests

use fake::{Fake, faker::lorem::en::Word};
use serde_json::{Value, json};

pub const ADMIN_NAME: &str = "server-admin";
pub const MEMBER_NAME: &str = "regular-member";

/// Sample question sent to the `ai` command.
pub const SAMPLE_QUERY: &str = "What is the borrow checker?";

/// Sample markdown answer returned by Gemini.
pub const SAMPLE_ANSWER: &str = "The **borrow checker** enforces Rust's ownership rules at compile time.";

/// Generates a plausible-looking API key.
pub fn random_api_key() -> String {
    let word: String = Word().fake();
    format!("AIza-{word}-{}", (1000..9999).fake::<u32>())
}

/// A successful `generateContent` response body carrying `text`.
pub fn gemini_text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 14 }
    })
}

/// An error body as returned by the Gemini API.
pub fn gemini_error_response(code: u16, status: &str, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message, "status": status } })
}
