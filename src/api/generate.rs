//! Prompt generation endpoint
//!
//! The single relay endpoint: validates the prompt, hands it to the
//! dispatcher, and serializes the outcome. The endpoint answers HTTP 200
//! for every outcome; failures are reported in the body as
//! `{"error": "..."}`, which existing clients depend on.

use axum::{extract::State, Json};

use crate::schemas::relay::{GenerateRequest, GenerateResponse};
use crate::server::state::AppState;
use crate::services::dispatcher::DispatchError;

/// User-visible error messages
pub const MISSING_PROMPT: &str = "Prompt is required.";
pub const NO_KEYS_CONFIGURED: &str = "No API keys configured. Contact Admin.";
pub const ALL_KEYS_FAILED: &str = "All API keys failed. Please contact admin to update keys.";

/// Prompt generation endpoint
///
/// POST /generate
pub async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Json<GenerateResponse> {
    // Prompt validation happens here, before the dispatcher is invoked
    let prompt = payload.prompt.as_deref().map(str::trim).unwrap_or("");
    if prompt.is_empty() {
        return Json(GenerateResponse::error(MISSING_PROMPT));
    }

    match state.dispatcher.dispatch(prompt).await {
        Ok(generation) => {
            tracing::debug!(attempts = generation.attempts, "Prompt served");
            Json(GenerateResponse::success(generation.text))
        }
        Err(DispatchError::NoCredentialsConfigured) => {
            Json(GenerateResponse::error(NO_KEYS_CONFIGURED))
        }
        Err(DispatchError::AllCredentialsFailed { attempts }) => {
            tracing::error!(attempts, "Generation failed for every configured key");
            Json(GenerateResponse::error(ALL_KEYS_FAILED))
        }
    }
}
