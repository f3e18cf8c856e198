//! Conversation Store Port - live conversations, one lock per conversation.
//!
//! The store hands out shared handles; a caller holds the conversation's
//! mutex for the whole of a turn so turns on one conversation never
//! interleave while different conversations proceed in parallel.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::conversation::TriageConversation;
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};

/// Shared, lockable handle to one conversation.
pub type ConversationHandle = Arc<Mutex<TriageConversation>>;

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Stores a new conversation and returns its handle.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the id is taken
    async fn insert(&self, conversation: TriageConversation) -> Result<ConversationHandle, StoreError>;

    /// Returns the handle for a conversation, if present.
    async fn get(&self, id: &ConversationId) -> Result<Option<ConversationHandle>, StoreError>;

    async fn exists(&self, id: &ConversationId) -> Result<bool, StoreError>;

    /// Removes a conversation. Returns true if it was present.
    async fn remove(&self, id: &ConversationId) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("conversation already exists: {0}")]
    AlreadyExists(ConversationId),

    #[error("conversation store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::new(ErrorCode::InternalError, err.to_string())
    }
}
