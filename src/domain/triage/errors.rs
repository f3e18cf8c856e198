//! Error types for the triage domain.

use thiserror::Error;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};

/// Caller-visible triage errors.
///
/// Everything the user types is absorbed by the engine; only turns that break
/// a conversation invariant end up here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriageError {
    #[error("Conversation {0} is closed")]
    ConversationClosed(ConversationId),

    #[error("Invalid phase transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Service '{0}' was not recommended in this conversation")]
    UnknownService(String),
}

impl TriageError {
    pub fn invalid_transition<P: std::fmt::Debug>(from: P, to: P) -> Self {
        TriageError::InvalidTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

impl From<TriageError> for DomainError {
    fn from(err: TriageError) -> Self {
        let code = match &err {
            TriageError::ConversationClosed(_) => ErrorCode::ConversationClosed,
            TriageError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            TriageError::UnknownService(_) => ErrorCode::ServiceNotFound,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Errors raised while loading a keyword table or service catalog.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to parse table: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to read table file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table: {0}")]
    Invalid(String),
}
