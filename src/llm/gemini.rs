//! Google Gemini backend
//!
//! Talks to the `generateContent` REST endpoint.

use crate::config::GeminiConfig;
use crate::error::{DinerError, Result};
use crate::llm::{Schema, TextModel};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini REST client
pub struct GeminiModel {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(DinerError::config("Gemini API key is required"));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl TextModel for GeminiModel {
    async fn generate(&self, model: &str, prompt: &str, schema: Option<&Schema>) -> Result<String> {
        let request = GeminiRequest::new(prompt, schema);

        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DinerError::network(
                    format!("Failed to connect to Gemini API: {}", e.without_url()),
                    None,
                    Some(url.clone()),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let error_msg = match status.as_u16() {
                401 => "Authentication failed (401). Please check your Gemini API key".to_string(),
                403 => "Access forbidden (403). Your API key may not have permission".to_string(),
                404 => format!("Model not found (404): {}", error_text),
                429 => "Rate limit exceeded (429). Please try again later".to_string(),
                500..=599 => format!("Gemini server error ({}). The API service is experiencing issues", status),
                _ => format!("Gemini API request failed ({}): {}", status, error_text),
            };

            return Err(DinerError::model_invocation(model, error_msg, Some(status.as_u16())));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| DinerError::parse(e.to_string(), None))?;

        gemini_response.into_text(model)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// Gemini API structures
#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig<'a>>,
}

impl<'a> GeminiRequest<'a> {
    fn new(prompt: &'a str, schema: Option<&'a Schema>) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: schema.map(|schema| GeminiGenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Schema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate
    fn into_text(self, model: &str) -> Result<String> {
        let candidate = match self.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                let reason = self
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .map_or_else(|| "no candidates returned".to_string(), |r| format!("prompt blocked ({})", r));
                return Err(DinerError::model_invocation(model, reason, None));
            }
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate
                .finish_reason
                .map_or_else(|| "empty response".to_string(), |r| format!("empty response ({})", r));
            return Err(DinerError::model_invocation(model, reason, None));
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
