//! Client for the Google Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Public Gemini API host.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// Model queried when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Instruction sent with every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer concisely and factually, using a friendly tone. Format responses in Markdown where appropriate.";

pub const MAX_OUTPUT_TOKENS: u32 = 256;
pub const TEMPERATURE: f32 = 0.7;
pub const CANDIDATE_COUNT: u32 = 1;

/// Harm categories covered by the safety settings.
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_HARASSMENT",
];

/// Errors that can occur during Gemini API interactions.
#[derive(Error, Debug)]
pub enum GeminiError {
    /// Error during HTTP request communication.
    #[error("API communication failure: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error body.
    #[error("Gemini API error {code} ({status}): {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
    },

    /// Error parsing the JSON response from the API.
    #[error("Unable to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured base URL or model name produced an invalid endpoint.
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The prompt itself was rejected.
    #[error("The prompt was blocked ({0})")]
    Blocked(String),

    /// The API returned no candidates.
    #[error("No response candidates were returned")]
    NoCandidates,

    /// The first candidate carried no text, usually because generation was stopped.
    #[error("The response contained no text (finish reason: {0})")]
    NoText(String),
}

/// Threshold at which content is blocked for each harm category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyThreshold {
    BlockNone,
    BlockOnlyHigh,
    #[default]
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

impl FromStr for SafetyThreshold {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_uppercase()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    candidate_count: u32,
    stop_sequences: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: SafetyThreshold,
}

/// The parts of a `generateContent` response the bot cares about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, mirroring what the SDKs expose as `response.text`.
    pub fn text(self) -> Result<String, GeminiError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GeminiError::Blocked(reason));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(GeminiError::NoCandidates)?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::NoText(
                candidate
                    .finish_reason
                    .unwrap_or_else(|| "UNKNOWN".to_string()),
            ));
        }

        Ok(text)
    }
}

/// Anything able to turn a prompt into a text answer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GeminiError>;
}

/// Issues one-shot `generateContent` requests with fixed generation parameters.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    safety_threshold: Option<SafetyThreshold>,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        safety_threshold: Option<SafetyThreshold>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            safety_threshold,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `{base}/v1beta/models/{model}:generateContent`
    fn endpoint(&self) -> Result<Url, GeminiError> {
        let mut base = Url::parse(&self.base_url)?;
        // Without a trailing slash `join` would replace the last path segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let path = format!("v1beta/models/{}:generateContent", self.model);
        Ok(base.join(&path)?)
    }

    fn build_request<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        let safety_settings = self
            .safety_threshold
            .map(|threshold| {
                HARM_CATEGORIES
                    .into_iter()
                    .map(|category| SafetySetting {
                        category,
                        threshold,
                    })
                    .collect()
            })
            .unwrap_or_default();

        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_PROMPT,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
                candidate_count: CANDIDATE_COUNT,
                stop_sequences: Vec::new(),
            },
            safety_settings,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GeminiError> {
        let url = self.endpoint()?;
        info!("Sending generateContent request to model '{}'", self.model);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Prefer the structured error body, fall back to the raw status.
            let err = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => GeminiError::Api {
                    code: if envelope.error.code == 0 {
                        status.as_u16()
                    } else {
                        envelope.error.code
                    },
                    status: envelope.error.status,
                    message: envelope.error.message,
                },
                Err(_) => GeminiError::Api {
                    code: status.as_u16(),
                    status: status.canonical_reason().unwrap_or_default().to_string(),
                    message: body,
                },
            };
            error!("Gemini request failed: {}", err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        match parsed.text() {
            Ok(text) => {
                debug!("Received {} characters from Gemini", text.len());
                Ok(text)
            }
            Err(e) => {
                warn!("Gemini returned no usable text: {}", e);
                Err(e)
            }
        }
    }
}
