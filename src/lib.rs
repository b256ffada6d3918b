//! Gemini prompt relay
//!
//! A single-endpoint HTTP relay that forwards user prompts to the Google
//! Gemini API, falling back across an ordered pool of API keys.

// Public modules
pub mod api;
pub mod config;
pub mod middleware;
pub mod schemas;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use config::Settings;
pub use server::App;
pub use services::Dispatcher;
