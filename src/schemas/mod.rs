//! Schema definitions
//!
//! Wire formats for the relay endpoint and the Gemini REST API.

pub mod gemini;
pub mod relay;
