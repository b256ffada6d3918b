//! Application state container
//!
//! This module defines the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::config::Settings;
use crate::services::dispatcher::Dispatcher;
use crate::services::gemini::GeminiClient;
use crate::services::key_pool::KeyPool;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
///
/// This struct holds all the shared resources that handlers need access to.
/// It is designed to be cheaply cloneable (via Arc) and thread-safe; the key
/// pool inside the dispatcher is read-only for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Prompt dispatcher with ordered key fallback
    pub dispatcher: Arc<Dispatcher>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state
    ///
    /// Builds the key pool from the configured keys and wires the Gemini
    /// client into the dispatcher.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let settings = Arc::new(settings);
        let start_time = Instant::now();

        let pool = KeyPool::from_raw(settings.api_keys.iter().cloned());
        if pool.is_empty() {
            tracing::warn!("No Gemini API keys configured; /generate will report an error");
        } else {
            tracing::info!(key_count = pool.len(), "Loaded Gemini API key pool");
        }

        let client = GeminiClient::new(&settings.gemini)?;
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(client), pool));

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            settings,
            dispatcher,
            start_time,
        })
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
