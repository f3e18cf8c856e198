//! Guidance Synthesizer Port - turns an assessment into prose for the user.
//!
//! The engine never depends on a synthesizer succeeding: a failed or slow
//! call only means the guidance message is left out of the turn.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl GuidanceSynthesizer for Canned {
//!     async fn synthesize(&self, request: &GuidanceRequest) -> Result<Guidance, GuidanceError> {
//!         Ok(Guidance {
//!             possible_causes: vec![],
//!             immediate_actions: vec!["Rest".to_string()],
//!             when_to_seek_help: vec![request.urgency.summary().to_string()],
//!         })
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

pub use crate::domain::conversation::{Guidance, GuidanceRequest};
use crate::domain::foundation::{DomainError, ErrorCode};

/// Port for guidance prose generation.
#[async_trait]
pub trait GuidanceSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &GuidanceRequest) -> Result<Guidance, GuidanceError>;
}

/// Synthesizer failures. None of these reach the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuidanceError {
    /// Backend is down or refused the request.
    #[error("guidance unavailable: {0}")]
    Unavailable(String),

    /// The call exceeded its time budget.
    #[error("guidance timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The backend answered with something unusable.
    #[error("invalid guidance: {0}")]
    Invalid(String),
}

impl From<GuidanceError> for DomainError {
    fn from(err: GuidanceError) -> Self {
        DomainError::new(ErrorCode::GuidanceUnavailable, err.to_string())
    }
}
