//! Application settings and configuration
//!
//! This module provides configuration management for the application,
//! loading settings from environment variables with sensible defaults.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Environment variables holding the Gemini API keys, in fallback order.
///
/// Unset or empty entries are filtered out when the pool is built; the
/// remaining keys keep this ordering for the lifetime of the process.
pub const API_KEY_ENV_VARS: [&str; 5] = [
    "GEMINI_KEY_1",
    "GEMINI_KEY_2",
    "GEMINI_KEY_3",
    "GEMINI_KEY_4",
    "GEMINI_KEY_5",
];

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!(
                "Invalid environment: {}. Expected: development, staging, or production",
                s
            ),
        }
    }
}

/// Gemini upstream configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiSettings {
    /// Model name (e.g. "gemini-3-flash-preview")
    pub model: String,

    /// Base URL override (default: generativelanguage.googleapis.com)
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// System instruction sent with every request
    pub system_instruction: String,

    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            base_url: None,
            timeout_seconds: 120,
            system_instruction: "You are a helpful AI gift recommendation assistant."
                .to_string(),
            temperature: 1.0,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,

    // The single origin allowed to call this service
    pub allowed_origin: String,

    // Gemini upstream
    pub gemini: GeminiSettings,

    // API keys, in fallback order
    #[serde(skip_serializing, default)]
    pub api_keys: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        let settings = Self {
            // App settings
            app_name: env_or_default("APP_NAME", "gemini-relay"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: env_or_default("ENVIRONMENT", "development")
                .parse()
                .unwrap_or_default(),
            log_level: env_or_default("LOG_LEVEL", "info"),

            // Server settings
            host: env_or_default("HOST", "0.0.0.0"),
            port: env_or_default("PORT", "5000")
                .parse()
                .context("Invalid PORT value")?,

            allowed_origin: env_or_default("ALLOWED_ORIGIN", "http://localhost:3000"),

            // Gemini upstream
            gemini: GeminiSettings {
                model: env_or_default("GEMINI_MODEL", "gemini-3-flash-preview"),
                base_url: env::var("GEMINI_BASE_URL").ok(),
                timeout_seconds: env_or_default("GEMINI_TIMEOUT_SECONDS", "120")
                    .parse()
                    .context("Invalid GEMINI_TIMEOUT_SECONDS value")?,
                system_instruction: env_or_default(
                    "SYSTEM_INSTRUCTION",
                    "You are a helpful AI gift recommendation assistant.",
                ),
                temperature: env_or_default("TEMPERATURE", "1.0")
                    .parse()
                    .context("Invalid TEMPERATURE value")?,
            },

            // API keys
            api_keys: Self::load_api_keys(),
        };

        // Validate settings
        settings.validate()?;

        Ok(settings)
    }

    /// Load API keys from the numbered environment variables
    ///
    /// Unset or blank entries are dropped; ordering is preserved so that
    /// GEMINI_KEY_1 has the highest fallback priority.
    fn load_api_keys() -> Vec<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| env::var(name).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect()
    }

    /// Validate settings
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.gemini.timeout_seconds == 0 {
            anyhow::bail!("Gemini timeout_seconds must be > 0");
        }

        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            anyhow::bail!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.gemini.temperature
            );
        }

        if self.allowed_origin.is_empty() {
            anyhow::bail!("ALLOWED_ORIGIN cannot be empty");
        }

        // An empty pool is a valid degenerate state; the endpoint reports it
        // per-request instead of refusing to start.
        if self.api_keys.is_empty() {
            tracing::warn!("No Gemini API keys configured");
        }

        Ok(())
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "gemini-relay".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            allowed_origin: "http://localhost:3000".to_string(),
            gemini: GeminiSettings::default(),
            api_keys: Vec::new(),
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
