//! StartConversationHandler - Command handler for opening a triage conversation.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::conversation::TriageConversation;
use crate::domain::foundation::{ConversationId, MemberId};
use crate::domain::triage::SeedContext;
use crate::ports::{ConversationStore, ProfileLoader, StoreError};

/// Command to open a conversation with an explicit seed.
#[derive(Debug, Clone, Default)]
pub struct StartConversationCommand {
    pub seed: SeedContext,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StartConversationError {
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for StartConversationError {
    fn from(err: StoreError) -> Self {
        StartConversationError::Storage(err.to_string())
    }
}

pub struct StartConversationHandler {
    store: Arc<dyn ConversationStore>,
    profiles: Arc<dyn ProfileLoader>,
}

impl StartConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>, profiles: Arc<dyn ProfileLoader>) -> Self {
        Self { store, profiles }
    }

    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<ConversationId, StartConversationError> {
        self.open(TriageConversation::new(cmd.seed)).await
    }

    /// Opens a conversation seeded from the member's profile.
    ///
    /// A missing or unreachable profile is not an error: the conversation
    /// starts with an empty seed instead.
    pub async fn handle_for_member(
        &self,
        member_id: MemberId,
    ) -> Result<ConversationId, StartConversationError> {
        let seed = match self.profiles.load_seed(&member_id).await {
            Ok(seed) => seed,
            Err(err) => {
                warn!(member_id = %member_id, error = %err, "profile unavailable, starting without seed");
                SeedContext::default()
            }
        };
        self.open(TriageConversation::for_member(member_id, seed)).await
    }

    async fn open(
        &self,
        conversation: TriageConversation,
    ) -> Result<ConversationId, StartConversationError> {
        let id = conversation.id();
        let skipped = conversation.skipped_questions().len();
        let entry_point = conversation.seed().entry_point.clone();

        self.store.insert(conversation).await?;

        info!(
            conversation_id = %id,
            skipped_questions = skipped,
            entry_point = entry_point.as_deref().unwrap_or("direct"),
            "conversation started"
        );
        Ok(id)
    }
}
