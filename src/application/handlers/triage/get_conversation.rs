//! GetConversationHandler - Query handler for a conversation transcript.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::conversation::ConversationSnapshot;
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};
use crate::ports::{ConversationStore, StoreError};

#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub conversation_id: ConversationId,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GetConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for GetConversationError {
    fn from(err: StoreError) -> Self {
        GetConversationError::Storage(err.to_string())
    }
}

impl From<GetConversationError> for DomainError {
    fn from(err: GetConversationError) -> Self {
        let code = match &err {
            GetConversationError::NotFound(_) => ErrorCode::ConversationNotFound,
            GetConversationError::Storage(_) => ErrorCode::InternalError,
        };
        DomainError::new(code, err.to_string())
    }
}

pub struct GetConversationHandler {
    store: Arc<dyn ConversationStore>,
}

impl GetConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Returns a point-in-time copy of the conversation.
    ///
    /// Waits for any in-flight turn on the same conversation to finish.
    pub async fn handle(
        &self,
        query: GetConversationQuery,
    ) -> Result<ConversationSnapshot, GetConversationError> {
        let handle = self
            .store
            .get(&query.conversation_id)
            .await?
            .ok_or(GetConversationError::NotFound(query.conversation_id))?;

        let conversation = handle.lock().await;
        Ok(conversation.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryConversationStore;
    use crate::domain::conversation::{ConversationPhase, TriageConversation};
    use crate::domain::triage::SeedContext;

    #[tokio::test]
    async fn returns_snapshot_of_stored_conversation() {
        let store = InMemoryConversationStore::new();
        let conv = TriageConversation::new(SeedContext::default());
        let id = conv.id();
        store.insert(conv).await.unwrap();

        let handler = GetConversationHandler::new(Arc::new(store));
        let snapshot = handler
            .handle(GetConversationQuery { conversation_id: id })
            .await
            .unwrap();
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.phase, ConversationPhase::Initial);
        assert!(snapshot.messages.is_empty());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let handler = GetConversationHandler::new(Arc::new(InMemoryConversationStore::new()));
        let id = ConversationId::new();
        let result = handler.handle(GetConversationQuery { conversation_id: id }).await;
        assert_eq!(result.err(), Some(GetConversationError::NotFound(id)));
    }
}
