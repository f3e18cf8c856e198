//! Conversation domain module.
//!
//! A triage conversation moves through
//! `initial -> gathering -> guidance -> service_routing -> completed`, with
//! an escape to `completed` from any open phase when a red flag fires.

mod acknowledgment;
mod aggregate;
mod engine;
mod follow_up;
mod guidance;
mod message;
mod phase;

pub use acknowledgment::{acknowledgment, FixedPicker, PhrasePicker, RandomPicker};
pub use aggregate::{ConversationSnapshot, TriageConversation};
pub use engine::{PendingGuidance, TriageEngine, TurnInput, TurnStep};
pub use follow_up::follow_up_reply;
pub use guidance::{Guidance, GuidanceRequest};
pub use message::{Message, MessageContent, MessageRole};
pub use phase::ConversationPhase;
