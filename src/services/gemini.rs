//! Gemini client for Google Gemini API interactions
//!
//! This module handles communication with the Google Gemini API using REST.
//! One call to [`GeminiClient::generate_content`] is one attempt with one
//! key; fallback across keys is the dispatcher's concern.

use crate::config::GeminiSettings;
use crate::schemas::gemini::{
    GeminiContent, GeminiError, GeminiRequest, GeminiResponse, GenerationConfig,
};
use crate::services::dispatcher::{BackendFault, GenerateBackend};
use crate::services::key_pool::ApiKey;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Errors that can occur when calling the Gemini API
#[derive(Error, Debug)]
pub enum GeminiClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {code} - {message}")]
    Api { code: i32, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Response contained no generated text")]
    EmptyResponse,
}

/// Client for the Gemini generateContent API.
///
/// Requests carry a fixed system instruction and sampling temperature taken
/// from configuration; the upstream call is bounded by the configured
/// timeout so a hung upstream fails the attempt instead of blocking the
/// dispatch indefinitely.
pub struct GeminiClient {
    client: Client,
    base_url: Option<String>,
    model: String,
    system_instruction: String,
    temperature: f32,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: &GeminiSettings) -> Result<Self, GeminiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            system_instruction: config.system_instruction.clone(),
            temperature: config.temperature,
        })
    }

    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(GEMINI_API_BASE)
    }

    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::user(prompt)],
            system_instruction: Some(GeminiContent::system(&self.system_instruction)),
            generation_config: Some(GenerationConfig {
                temperature: Some(self.temperature),
                ..Default::default()
            }),
        }
    }

    /// Generate content with a single key (one attempt, no fallback)
    pub async fn generate_content(
        &self,
        api_key: &ApiKey,
        prompt: &str,
    ) -> Result<String, GeminiClientError> {
        let url = format!("{}/models/{}:generateContent", self.base_url(), self.model);

        tracing::debug!(
            model = %self.model,
            url = %url,
            key = %api_key,
            "Calling Gemini generateContent API"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose())
            .header("Content-Type", "application/json")
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as a Gemini error envelope
            if let Ok(gemini_error) = serde_json::from_str::<GeminiError>(&error_text) {
                return Err(GeminiClientError::Api {
                    code: gemini_error.error.code,
                    message: gemini_error.error.message,
                });
            }

            return Err(GeminiClientError::Api {
                code: status.as_u16() as i32,
                message: error_text,
            });
        }

        let body = response.text().await?;
        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse Gemini response");
            GeminiClientError::Parse(e.to_string())
        })?;

        parsed.text().ok_or(GeminiClientError::EmptyResponse)
    }
}

#[async_trait]
impl GenerateBackend for GeminiClient {
    async fn generate(&self, key: &ApiKey, prompt: &str) -> Result<String, BackendFault> {
        self.generate_content(key, prompt)
            .await
            .map_err(|err| BackendFault(err.to_string()))
    }
}
