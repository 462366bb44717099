//! Client for a WhatsApp REST bridge.
//!
//! The bridge owns the WhatsApp session; this crate only polls it for
//! inbound events and posts outgoing text.

mod client;
mod error;
mod receiver;
mod types;

pub use client::WhatsAppClient;
pub use error::TransportError;
pub use receiver::MessageReceiver;
pub use types::*;
