//! Message receiver with polling.

use crate::client::WhatsAppClient;
use crate::types::*;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Polls the bridge and yields chat messages.
pub struct MessageReceiver {
    client: WhatsAppClient,
    poll_interval: Duration,
    error_backoff: Duration,
}

impl MessageReceiver {
    pub fn new(client: WhatsAppClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
            error_backoff: Duration::from_secs(5),
        }
    }

    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Start receiving messages as an async stream.
    pub fn stream(self) -> impl Stream<Item = ChatMessage> {
        async_stream::stream! {
            loop {
                match self.client.receive().await {
                    Ok(events) => {
                        for event in events {
                            if let Some(msg) = ChatMessage::from_event(&event) {
                                let preview: String = msg.text.chars().take(50).collect();
                                debug!("Received: {} from {}", preview, msg.sender);
                                yield msg;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Receive error: {}", e);
                        sleep(self.error_backoff).await;
                        continue;
                    }
                }

                sleep(self.poll_interval).await;
            }
        }
    }
}
