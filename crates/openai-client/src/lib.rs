//! Client for OpenAI-compatible chat-completions APIs.

mod client;
mod error;
mod types;

pub use client::{OpenAiClient, DEFAULT_BASE_URL};
pub use error::OpenAiError;
pub use types::*;
