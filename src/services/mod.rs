//! Services module
//!
//! Contains the dispatch core and the Gemini upstream integration.

pub mod dispatcher;
pub mod gemini;
pub mod key_pool;

pub use dispatcher::{BackendFault, DispatchError, Dispatcher, GenerateBackend, Generation};
pub use gemini::{GeminiClient, GeminiClientError};
pub use key_pool::{ApiKey, KeyPool};
