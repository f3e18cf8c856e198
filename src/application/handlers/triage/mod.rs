//! Triage command and query handlers.

mod get_conversation;
mod process_turn;
mod start_conversation;

pub use get_conversation::{GetConversationError, GetConversationHandler, GetConversationQuery};
pub use process_turn::{
    ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler, TurnResult, DEFAULT_GUIDANCE_TIMEOUT,
};
pub use start_conversation::{
    StartConversationCommand, StartConversationError, StartConversationHandler,
};
