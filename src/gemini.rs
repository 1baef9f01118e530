use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use serde::Deserialize;
use reqwest::Client;
use tracing::{info, error};

use crate::config::{AuthMode, GeminiSettings, GenerationParams};

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not set")] MissingApiKey,
    #[error("HTTP error: {0}")] Http(String),
    #[error("HTTP {status}: {body}")] Status { status: u16, body: String },
    #[error("invalid response shape: {0}")] InvalidResponse(String),
}

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str, params: &GenerationParams) -> Result<String, GeminiError>;
}

pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Self {
        Self { client: Client::new(), settings }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.settings.base_url, self.settings.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str, params: &GenerationParams) -> Result<String, GeminiError> {
        let api_key = self.settings.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let url = self.endpoint();

        info!("🔗 Making request to: {} (auth: {:?})", url, self.settings.auth_mode);

        let payload = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "temperature": params.temperature,
                "topK": params.top_k,
                "topP": params.top_p,
                "maxOutputTokens": params.max_output_tokens
            }
        });

        let request = self.client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload);
        let request = match self.settings.auth_mode {
            AuthMode::Query => request.query(&[("key", api_key)]),
            AuthMode::Bearer => request.bearer_auth(api_key),
        };

        let response = request
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string().replace(api_key, "***")))?;

        let status = response.status();
        info!("📥 Response status: {}", status);
        let response_text = response.text().await.map_err(|e| GeminiError::Http(e.to_string()))?;

        if !status.is_success() {
            error!("❌ Gemini API text generation failed with status {}: {}", status, response_text);
            return Err(GeminiError::Status { status: status.as_u16(), body: response_text });
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::InvalidResponse(format!("envelope is not JSON: {}", e)))?;

        let text = first_candidate_text(&parsed)
            .ok_or_else(|| GeminiError::InvalidResponse("no text in first candidate".to_string()))?;

        info!("📥 Raw generated text: {}", preview(&text, 500));
        Ok(text)
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Option<Content> }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Deserialize)]
struct Part { #[serde(default)] text: Option<String> }

fn first_candidate_text(resp: &GeminiResponse) -> Option<String> {
    resp.candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|p| p.text.clone())
}

pub(crate) fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...[{} chars total]", &text[..idx], text.chars().count()),
        None => text.to_string(),
    }
}
