//! Authorize and revoke numbers from chat.

use authorized_store::{extract_candidate, AddOutcome, AuthorizedStore, RemoveOutcome, StoreError};
use tracing::{error, info, warn};

pub const NO_NUMBER_FOUND: &str = "⚠️ Nenhum número válido encontrado.";

/// Result of an admin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminReply {
    /// Reply for the chat the command came from.
    pub text: String,
    /// Number newly authorized by this command, if any.
    pub added: Option<String>,
}

impl From<String> for AdminReply {
    fn from(text: String) -> Self {
        Self { text, added: None }
    }
}

/// Handle an add-number request.
pub async fn add_number(
    store: &AuthorizedStore,
    requester: &str,
    text: &str,
    prefix: &str,
) -> AdminReply {
    let Some(candidate) = extract_candidate(text) else {
        return NO_NUMBER_FOUND.to_string().into();
    };

    match store.add(&candidate).await {
        Ok(AddOutcome::Added(number)) => {
            info!("{} Number {} added by {}", prefix, number, requester);
            AdminReply {
                text: format!("✅ Número {} adicionado à lista de autorizados.", number),
                added: Some(number.into_inner()),
            }
        }
        Ok(AddOutcome::AlreadyAuthorized(number)) => {
            info!("{} Number {} was already authorized", prefix, number);
            format!("ℹ️ Número {} já estava autorizado.", number).into()
        }
        Err(e) => failure(store, e, prefix).into(),
    }
}

/// Handle a remove-number request.
pub async fn remove_number(
    store: &AuthorizedStore,
    requester: &str,
    text: &str,
    prefix: &str,
) -> AdminReply {
    let Some(candidate) = extract_candidate(text) else {
        return NO_NUMBER_FOUND.to_string().into();
    };

    match store.remove(requester, &candidate).await {
        Ok(RemoveOutcome::Removed(number)) => {
            info!("{} Number {} removed by {}", prefix, number, requester);
            format!("🗑️ Número {} removido da lista de autorizados.", number).into()
        }
        Ok(RemoveOutcome::NotPresent(number)) => {
            info!("{} Number {} was not authorized", prefix, number);
            format!("ℹ️ Número {} não estava na lista de autorizados.", number).into()
        }
        Err(e) => failure(store, e, prefix).into(),
    }
}

fn failure(store: &AuthorizedStore, err: StoreError, prefix: &str) -> String {
    if err.is_persistence() {
        // The in-memory view may now disagree with the file until the next load.
        error!(
            "{} Failed to persist authorized numbers at {}: {}",
            prefix,
            store.path().display(),
            err
        );
    } else {
        warn!("{} Admin command rejected: {}", prefix, err);
    }
    err.user_message()
}
