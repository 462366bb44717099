//! Collaborator interfaces consumed by the dispatcher, and their adapters
//! onto the concrete clients.

use crate::error::CollaboratorError;
use async_trait::async_trait;
use market_data::{CoinGeckoClient, CryptoPanicClient, PriceSnapshot};
use openai_client::OpenAiClient;
use tracing::debug;
use whatsapp_client::WhatsAppClient;

/// Outgoing text delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Reply into a chat (direct or group).
    async fn reply(&self, chat: &str, text: &str) -> Result<(), CollaboratorError>;

    /// Send directly to a phone number.
    async fn send_to(&self, phone: &str, text: &str) -> Result<(), CollaboratorError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceService: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<String, CollaboratorError>;

    /// Current USD price and official all-time high.
    async fn usd_snapshot(&self, symbol: &str) -> Result<PriceSnapshot, CollaboratorError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsService: Send + Sync {
    async fn digest(&self) -> Result<String, CollaboratorError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CollaboratorError>;
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn reply(&self, chat: &str, text: &str) -> Result<(), CollaboratorError> {
        WhatsAppClient::reply(self, chat, text)
            .await
            .map_err(|e| CollaboratorError::new("whatsapp", e.to_string()))
    }

    async fn send_to(&self, phone: &str, text: &str) -> Result<(), CollaboratorError> {
        WhatsAppClient::send_to(self, phone, text)
            .await
            .map_err(|e| CollaboratorError::new("whatsapp", e.to_string()))
    }
}

#[async_trait]
impl PriceService for CoinGeckoClient {
    async fn quote(&self, symbol: &str) -> Result<String, CollaboratorError> {
        CoinGeckoClient::quote(self, symbol)
            .await
            .map_err(|e| CollaboratorError::new("coingecko", e.to_string()))
    }

    async fn usd_snapshot(&self, symbol: &str) -> Result<PriceSnapshot, CollaboratorError> {
        CoinGeckoClient::usd_snapshot(self, symbol)
            .await
            .map_err(|e| CollaboratorError::new("coingecko", e.to_string()))
    }
}

#[async_trait]
impl NewsService for CryptoPanicClient {
    async fn digest(&self) -> Result<String, CollaboratorError> {
        CryptoPanicClient::digest(self)
            .await
            .map_err(|e| CollaboratorError::new("cryptopanic", e.to_string()))
    }
}

/// AI chat backed by a chat-completions client and a fixed system prompt.
pub struct OpenAiService {
    client: OpenAiClient,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiService {
    pub fn new(
        client: OpenAiClient,
        system_prompt: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl AiService for OpenAiService {
    async fn complete(&self, prompt: &str) -> Result<String, CollaboratorError> {
        debug!("Sending prompt to {}", self.client.model());
        self.client
            .complete(
                &self.system_prompt,
                prompt,
                Some(self.temperature),
                Some(self.max_tokens),
            )
            .await
            .map_err(|e| CollaboratorError::new("openai", e.to_string()))
    }
}
