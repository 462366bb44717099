//! Bot actions that produce a reply without an external collaborator.

pub mod admin;
pub mod help;

pub use admin::{add_number, remove_number, AdminReply, NO_NUMBER_FOUND};
pub use help::{help_text, PING_REPLY};
