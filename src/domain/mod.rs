//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `triage` - Red flags, context parsing, follow-up questions, urgency and routing
//! - `conversation` - Conversation aggregate, transcript and turn engine

pub mod conversation;
pub mod foundation;
pub mod triage;
