//! Credential-fallback dispatcher
//!
//! The core of the relay: given a prompt and an ordered key pool, try each
//! key in turn against the generation backend and return the first success.
//! Every request starts from the first key; there is no round-robin and no
//! memory of previous outcomes.

use crate::services::key_pool::{ApiKey, KeyPool};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Opaque fault raised by a single generation attempt.
///
/// Auth failures, quota exhaustion, network errors, and malformed responses
/// are all handled identically, so the fault carries only its description.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct BackendFault(pub String);

/// A backend capable of one generation attempt with one key.
#[async_trait]
pub trait GenerateBackend: Send + Sync {
    async fn generate(&self, key: &ApiKey, prompt: &str) -> Result<String, BackendFault>;
}

/// Terminal failure of a dispatch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("No credentials configured")]
    NoCredentialsConfigured,

    #[error("All credentials failed")]
    AllCredentialsFailed {
        /// Number of keys tried (equals the pool size)
        attempts: usize,
    },
}

/// Successful dispatch result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// The generated text
    pub text: String,

    /// Number of keys tried, including the one that succeeded
    pub attempts: usize,
}

/// Dispatches prompts to the backend with ordered key fallback
pub struct Dispatcher {
    backend: Arc<dyn GenerateBackend>,
    pool: KeyPool,
}

impl Dispatcher {
    /// Create a new dispatcher over an immutable key pool
    pub fn new(backend: Arc<dyn GenerateBackend>, pool: KeyPool) -> Self {
        Self { backend, pool }
    }

    /// Number of keys available to this dispatcher
    pub fn key_count(&self) -> usize {
        self.pool.len()
    }

    /// Try each key in pool order and return the first success.
    ///
    /// Attempts are strictly sequential within one dispatch; any fault
    /// advances to the next key. An empty pool fails immediately without
    /// touching the network.
    pub async fn dispatch(&self, prompt: &str) -> Result<Generation, DispatchError> {
        if self.pool.is_empty() {
            tracing::warn!("Dispatch refused: no API keys configured");
            return Err(DispatchError::NoCredentialsConfigured);
        }

        for (index, key) in self.pool.iter().enumerate() {
            tracing::info!(attempt = index + 1, key = %key, "Trying API key");

            match self.backend.generate(key, prompt).await {
                Ok(text) => {
                    tracing::info!(attempt = index + 1, key = %key, "Generation succeeded");
                    return Ok(Generation {
                        text,
                        attempts: index + 1,
                    });
                }
                Err(fault) => {
                    tracing::warn!(
                        attempt = index + 1,
                        key = %key,
                        error = %fault,
                        "API key failed"
                    );
                }
            }
        }

        tracing::error!(attempts = self.pool.len(), "All API keys failed");
        Err(DispatchError::AllCredentialsFailed {
            attempts: self.pool.len(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
