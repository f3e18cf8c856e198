//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod triage;

pub use triage::{
    GetConversationError, GetConversationHandler, GetConversationQuery, ProcessTurnCommand,
    ProcessTurnError, ProcessTurnHandler, StartConversationCommand, StartConversationError,
    StartConversationHandler, TurnResult, DEFAULT_GUIDANCE_TIMEOUT,
};
