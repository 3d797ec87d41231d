use crate::models::{ConversationRecord, NewConversation};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when persisting or reading conversation records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Persistence for analyzed conversations
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a new record and return it with its id and timestamps
    async fn insert(&self, conversation: NewConversation) -> Result<ConversationRecord, StoreError>;

    /// All records, newest first
    async fn list_recent(&self) -> Result<Vec<ConversationRecord>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
