//! The single action an inbound message maps to.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Ping,
    Help,
    CryptoNews,
    /// `!<symbol>`, lower-cased.
    CryptoPrice(String),
    /// Canonical greeting category.
    Greeting(String),
    /// Canonical interaction category.
    Interaction(String),
    /// Raw message text, kept intact so digit grouping survives extraction.
    AdminAddNumber(String),
    AdminRemoveNumber(String),
    /// Prompt forwarded to the AI service.
    AiChat(String),
    Ignored,
}

impl Intent {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Ping => "ping",
            Intent::Help => "help",
            Intent::CryptoNews => "crypto_news",
            Intent::CryptoPrice(_) => "crypto_price",
            Intent::Greeting(_) => "greeting",
            Intent::Interaction(_) => "interaction",
            Intent::AdminAddNumber(_) => "admin_add_number",
            Intent::AdminRemoveNumber(_) => "admin_remove_number",
            Intent::AiChat(_) => "ai_chat",
            Intent::Ignored => "ignored",
        }
    }

    /// Whether this intent mutates the authorized-number store.
    pub fn is_admin(&self) -> bool {
        matches!(self, Intent::AdminAddNumber(_) | Intent::AdminRemoveNumber(_))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::CryptoPrice(arg) | Intent::Greeting(arg) | Intent::Interaction(arg) => {
                write!(f, "{}({})", self.kind(), arg)
            }
            _ => f.write_str(self.kind()),
        }
    }
}
