//! LLM client — the single point of entry for all generative API calls.
//!
//! ARCHITECTURAL RULE: no other module may call the Gemini API directly.
//! All LLM interactions MUST go through this module.
//!
//! Calls are single-shot: a transport or service failure surfaces directly
//! to the caller with no retry, and the caller's usage counters are only
//! touched after a successful parse.
//!
//! Model: gemini-2.5-flash (hardcoded — do not make configurable to prevent drift)

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls.
pub const MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Per-call knobs: creativity and an optional declared output shape.
/// Schema-constrained calls (résumé generation/refinement) set
/// `response_schema`; free-text cover-letter calls leave it `None`.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub response_schema: Option<Value>,
}

impl GenerationOptions {
    pub fn free_text(temperature: f32) -> Self {
        Self {
            temperature,
            response_schema: None,
        }
    }

    pub fn structured(temperature: f32, schema: Value) -> Self {
        Self {
            temperature,
            response_schema: Some(schema),
        }
    }
}

/// Seam for the generative API. Production uses `GeminiClient`; pipeline
/// tests substitute a canned backend.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Issues a single request and returns the raw text of the response.
    async fn generate(&self, prompt: &str, opts: &GenerationOptions) -> Result<String, LlmError>;
}

/// The production Gemini client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, prompt: &str, opts: &GenerationOptions) -> Result<String, LlmError> {
        let mut generation_config = json!({ "temperature": opts.temperature });
        if let Some(schema) = &opts.response_schema {
            generation_config["responseMimeType"] = json!("application/json");
            generation_config["responseSchema"] = schema.clone();
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });

        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        let text = payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|t| t.as_str())
            .ok_or(LlmError::EmptyContent)?;

        debug!("LLM call succeeded: {} chars returned", text.len());
        Ok(text.to_string())
    }
}

/// Strips Markdown code fences, isolates the outermost `{...}` substring,
/// and parses it. The brace isolation is defensive against leading or
/// trailing commentary the model may emit around the JSON object.
pub fn parse_json_response<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let cleaned = isolate_json_object(text);
    serde_json::from_str(cleaned).map_err(|e| LlmError::UnexpectedFormat(e.to_string()))
}

/// Strips ```json ... ``` or ``` ... ``` fences, then narrows to the first
/// `{` through the last `}`. Returns the input unchanged when no balanced
/// braces are present; the subsequent parse reports the failure.
fn isolate_json_object(text: &str) -> &str {
    let text = strip_json_fences(text);
    match (text.find('{'), text.rfind('}')) {
        (Some(first), Some(last)) if last > first => &text[first..=last],
        _ => text,
    }
}

fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
