//! WhatsApp bridge HTTP client.

use crate::error::TransportError;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// HTTP client for the WhatsApp REST bridge.
#[derive(Clone)]
pub struct WhatsAppClient {
    client: Client,
    base_url: String,
}

impl WhatsAppClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the bridge is up and its session is connected.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/v1/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Drain pending inbound events.
    #[instrument(skip(self))]
    pub async fn receive(&self) -> Result<Vec<IncomingEvent>, TransportError> {
        let response = self
            .client
            .get(format!("{}/v1/messages/receive", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(TransportError::Api(msg));
        }

        let events: Vec<IncomingEvent> = response.json().await?;
        debug!("Received {} events", events.len());
        Ok(events)
    }

    /// Send text to a JID.
    #[instrument(skip(self, text))]
    pub async fn send(&self, to: &str, text: &str) -> Result<(), TransportError> {
        if text.trim().is_empty() {
            warn!("Skipping empty message to {}", to);
            return Err(TransportError::EmptyMessage(to.to_string()));
        }

        let request = SendMessageRequest {
            to: to.to_string(),
            text: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/v1/messages/send", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            warn!("Send failed: {}", msg);
            return Err(TransportError::SendFailed(msg));
        }

        debug!("Sent message to {}", to);
        Ok(())
    }

    /// Reply into the chat a message came from.
    pub async fn reply(&self, chat: &str, text: &str) -> Result<(), TransportError> {
        self.send(chat, text).await
    }

    /// Send directly to a phone number.
    pub async fn send_to(&self, phone: &str, text: &str) -> Result<(), TransportError> {
        self.send(&user_jid(phone), text).await
    }
}
