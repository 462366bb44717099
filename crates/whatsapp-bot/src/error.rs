//! Application error types.

use thiserror::Error;

/// Failure reported by an external collaborator (transport, price, news, AI).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{service} error: {message}")]
pub struct CollaboratorError {
    pub service: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("WhatsApp error: {0}")]
    Transport(#[from] whatsapp_client::TransportError),

    #[error("WhatsApp bridge not reachable at {0}")]
    BridgeUnavailable(String),

    #[error("OpenAI error: {0}")]
    OpenAi(#[from] openai_client::OpenAiError),

    #[error("Market data error: {0}")]
    MarketData(#[from] market_data::MarketDataError),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
