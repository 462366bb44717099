//! WhatsApp bridge types.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// JID server suffix for individual accounts.
pub const USER_SERVER: &str = "s.whatsapp.net";

/// JID server suffix for group chats.
pub const GROUP_SERVER: &str = "g.us";

/// Inbound event as delivered by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingEvent {
    pub id: String,
    /// Sender JID, e.g. `5511999990000@s.whatsapp.net`.
    pub sender: String,
    /// Chat JID; group chats end in `@g.us`.
    pub chat: String,
    #[serde(default, rename = "fromMe")]
    pub from_me: bool,
    #[serde(default, rename = "isGroup")]
    pub is_group: bool,
    /// Plain conversation text.
    #[serde(default)]
    pub conversation: Option<String>,
    /// Text of an extended (quoted, linked) message.
    #[serde(default, rename = "extendedText")]
    pub extended_text: Option<String>,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Outgoing message request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub to: String,
    pub text: String,
}

/// Send message response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    pub id: Option<String>,
    pub timestamp: Option<i64>,
}

/// Parsed message for bot processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Sender phone number with the JID server stripped.
    pub sender: String,
    /// Chat JID to reply into.
    pub chat: String,
    pub is_group: bool,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a chat message from a bridge event.
    ///
    /// Returns `None` for the bot's own messages and for events without text.
    pub fn from_event(event: &IncomingEvent) -> Option<Self> {
        if event.from_me {
            return None;
        }

        let text = event
            .conversation
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(event.extended_text.as_deref())?;
        if text.trim().is_empty() {
            return None;
        }

        Some(Self {
            sender: user_part(&event.sender).to_string(),
            chat: event.chat.clone(),
            is_group: event.is_group || is_group_jid(&event.chat),
            text: text.to_string(),
            timestamp: Utc
                .timestamp_opt(event.timestamp, 0)
                .single()
                .unwrap_or_else(Utc::now),
        })
    }
}

/// Strip the server (and any device suffix) from a JID.
pub fn user_part(jid: &str) -> &str {
    let user = jid.split('@').next().unwrap_or(jid);
    user.split(':').next().unwrap_or(user)
}

/// JID for an individual phone number.
pub fn user_jid(phone: &str) -> String {
    if phone.contains('@') {
        phone.to_string()
    } else {
        format!("{}@{}", phone, USER_SERVER)
    }
}

pub fn is_group_jid(jid: &str) -> bool {
    jid.rsplit_once('@')
        .map(|(_, server)| server == GROUP_SERVER)
        .unwrap_or(false)
}
