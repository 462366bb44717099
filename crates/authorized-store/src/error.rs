//! Authorized-number store errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Empty phone number")]
    EmptyInput,

    #[error("Invalid phone number: {0}")]
    InvalidFormat(String),

    #[error("Number {0} is fixed and cannot be added at runtime")]
    FixedNumberConflict(String),

    #[error("Number {0} is fixed and cannot be removed")]
    FixedNumberProtected(String),

    #[error("{0} tried to remove itself")]
    SelfRemovalBlocked(String),

    #[error("Failed to persist authorized numbers to {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Short reply shown to the chat when an administrative command fails.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::EmptyInput => "⚠️ Número vazio ignorado.".into(),
            StoreError::InvalidFormat(num) => format!("⚠️ Número inválido: {}", num),
            StoreError::FixedNumberConflict(num) => {
                format!("⚠️ Número {} é fixo, não pode ser adicionado via comando.", num)
            }
            StoreError::FixedNumberProtected(num) => {
                format!("⚠️ O número {} é fixo e não pode ser removido.", num)
            }
            StoreError::SelfRemovalBlocked(_) => {
                "⚠️ Você não pode remover o seu próprio número.".into()
            }
            StoreError::Persistence { .. } | StoreError::Serialization(_) => {
                "❌ Não foi possível salvar a lista de autorizados. Tente novamente.".into()
            }
        }
    }

    /// Whether the durable file may now disagree with the in-memory view.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            StoreError::Persistence { .. } | StoreError::Serialization(_)
        )
    }
}
