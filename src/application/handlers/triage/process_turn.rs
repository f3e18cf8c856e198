//! ProcessTurnHandler - Command handler for one user turn.
//!
//! Holds the conversation's lock for the whole turn, guidance call included,
//! so concurrent turns on one conversation are applied one after another.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::GuidanceConfig;
use crate::domain::conversation::{ConversationPhase, Message, TriageEngine, TurnInput, TurnStep};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};
use crate::domain::triage::{ServiceRecommendation, TriageError, UrgencyLevel};
use crate::ports::{ConversationStore, Guidance, GuidanceRequest, GuidanceSynthesizer, StoreError};

pub const DEFAULT_GUIDANCE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub conversation_id: ConversationId,
    pub input: TurnInput,
}

/// What the presentation layer renders after a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Assistant messages produced by this turn, in order.
    pub messages: Vec<Message>,
    pub phase: ConversationPhase,
    pub urgency: Option<UrgencyLevel>,
    pub recommendations: Option<Vec<ServiceRecommendation>>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessTurnError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Conversation {0} is closed")]
    Closed(ConversationId),

    #[error("Turn rejected: {0}")]
    Rejected(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for ProcessTurnError {
    fn from(err: StoreError) -> Self {
        ProcessTurnError::Storage(err.to_string())
    }
}

impl From<TriageError> for ProcessTurnError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::ConversationClosed(id) => ProcessTurnError::Closed(id),
            other => ProcessTurnError::Rejected(other.to_string()),
        }
    }
}

impl From<ProcessTurnError> for DomainError {
    fn from(err: ProcessTurnError) -> Self {
        let code = match &err {
            ProcessTurnError::NotFound(_) => ErrorCode::ConversationNotFound,
            ProcessTurnError::Closed(_) => ErrorCode::ConversationClosed,
            ProcessTurnError::Rejected(_) => ErrorCode::ValidationFailed,
            ProcessTurnError::Storage(_) => ErrorCode::InternalError,
        };
        DomainError::new(code, err.to_string())
    }
}

pub struct ProcessTurnHandler {
    store: Arc<dyn ConversationStore>,
    engine: Arc<TriageEngine>,
    synthesizer: Arc<dyn GuidanceSynthesizer>,
    guidance_timeout: Duration,
}

impl ProcessTurnHandler {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        engine: Arc<TriageEngine>,
        synthesizer: Arc<dyn GuidanceSynthesizer>,
    ) -> Self {
        Self {
            store,
            engine,
            synthesizer,
            guidance_timeout: DEFAULT_GUIDANCE_TIMEOUT,
        }
    }

    /// Handler whose guidance wait follows `GuidanceConfig::timeout_ms`.
    pub fn from_config(
        store: Arc<dyn ConversationStore>,
        engine: Arc<TriageEngine>,
        synthesizer: Arc<dyn GuidanceSynthesizer>,
        config: &GuidanceConfig,
    ) -> Self {
        Self::new(store, engine, synthesizer).with_guidance_timeout(config.timeout())
    }

    pub fn with_guidance_timeout(mut self, guidance_timeout: Duration) -> Self {
        self.guidance_timeout = guidance_timeout;
        self
    }

    pub fn guidance_timeout(&self) -> Duration {
        self.guidance_timeout
    }

    pub async fn handle(&self, cmd: ProcessTurnCommand) -> Result<TurnResult, ProcessTurnError> {
        let id = cmd.conversation_id;
        let handle = self
            .store
            .get(&id)
            .await?
            .ok_or(ProcessTurnError::NotFound(id))?;

        let mut conversation = handle.lock().await;
        let phase_before = conversation.phase();

        let step = self.engine.process_turn(&mut conversation, cmd.input).map_err(|err| {
            warn!(conversation_id = %id, phase = %phase_before, error = %err, "turn rejected");
            ProcessTurnError::from(err)
        })?;

        let messages = match step {
            TurnStep::Done(messages) => messages,
            TurnStep::AwaitingGuidance(pending) => {
                let guidance = self.request_guidance(id, pending.request()).await;
                self.engine.complete_guidance(&mut conversation, pending, guidance)
            }
        };

        let phase = conversation.phase();
        let urgency = conversation.urgency();

        if let Some(detection) = conversation.emergency() {
            if phase_before != ConversationPhase::Completed {
                warn!(
                    conversation_id = %id,
                    phase_before = %phase_before,
                    categories = ?detection.rule_ids(),
                    "red flag detected, conversation closed"
                );
            }
        }
        if phase_before != phase {
            info!(
                conversation_id = %id,
                from = %phase_before,
                to = %phase,
                urgency = urgency.map(|u| u.as_str()).unwrap_or("unassessed"),
                "phase changed"
            );
        }

        let recommendations = conversation.recommendations();
        Ok(TurnResult {
            messages,
            phase,
            urgency,
            recommendations: (!recommendations.is_empty()).then(|| recommendations.to_vec()),
        })
    }

    /// Calls the synthesizer under the configured timeout.
    ///
    /// Failures are logged and swallowed; the turn goes on without guidance.
    async fn request_guidance(&self, id: ConversationId, request: &GuidanceRequest) -> Option<Guidance> {
        match timeout(self.guidance_timeout, self.synthesizer.synthesize(request)).await {
            Ok(Ok(guidance)) => Some(guidance),
            Ok(Err(err)) => {
                warn!(conversation_id = %id, error = %err, "guidance synthesis failed");
                None
            }
            Err(_) => {
                warn!(
                    conversation_id = %id,
                    timeout_ms = self.guidance_timeout.as_millis() as u64,
                    "guidance synthesis timed out"
                );
                None
            }
        }
    }
}
