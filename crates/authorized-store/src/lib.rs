//! Authorized-number storage for the WhatsApp bot.
//!
//! Numbers come from two places: a fixed set supplied by configuration at
//! startup, and a dynamic set managed at runtime through admin commands and
//! persisted as a JSON array. The two never overlap on disk.

mod error;
mod phone;
mod store;
mod types;

pub use error::StoreError;
pub use phone::{extract_candidate, validate, PhoneIdentity};
pub use store::AuthorizedStore;
pub use types::*;
