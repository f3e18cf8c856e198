//! In-Memory Conversation Store Adapter
//!
//! Keeps live conversations in a map of per-conversation mutexes. The map
//! lock is held only to look up or insert a handle, never across a turn.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::conversation::TriageConversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationHandle, ConversationStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationId, ConversationHandle>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }

    /// Clear all stored conversations (useful for tests)
    pub async fn clear(&self) {
        self.conversations.write().await.clear();
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn insert(&self, conversation: TriageConversation) -> Result<ConversationHandle, StoreError> {
        let id = conversation.id();
        let mut conversations = self.conversations.write().await;
        if conversations.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        let handle = Arc::new(Mutex::new(conversation));
        conversations.insert(id, Arc::clone(&handle));
        Ok(handle)
    }

    async fn get(&self, id: &ConversationId) -> Result<Option<ConversationHandle>, StoreError> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn exists(&self, id: &ConversationId) -> Result<bool, StoreError> {
        Ok(self.conversations.read().await.contains_key(id))
    }

    async fn remove(&self, id: &ConversationId) -> Result<bool, StoreError> {
        Ok(self.conversations.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::SeedContext;

    #[tokio::test]
    async fn insert_then_get_returns_same_handle() {
        let store = InMemoryConversationStore::new();
        let conv = TriageConversation::new(SeedContext::default());
        let id = conv.id();

        let handle = store.insert(conv).await.unwrap();
        let fetched = store.get(&id).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&handle, &fetched));
        assert!(store.exists(&id).await.unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryConversationStore::new();
        let conv = TriageConversation::new(SeedContext::default());
        let id = conv.id();
        store.insert(conv.clone()).await.unwrap();
        assert_eq!(store.insert(conv).await.err(), Some(StoreError::AlreadyExists(id)));
    }

    #[tokio::test]
    async fn missing_conversation_is_none() {
        let store = InMemoryConversationStore::new();
        assert!(store.get(&ConversationId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_reports_presence() {
        let store = InMemoryConversationStore::new();
        let conv = TriageConversation::new(SeedContext::default());
        let id = conv.id();
        store.insert(conv).await.unwrap();

        assert!(store.remove(&id).await.unwrap());
        assert!(!store.remove(&id).await.unwrap());
        assert!(store.is_empty().await);
    }
}
