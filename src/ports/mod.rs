//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationStore` - Live conversations behind per-conversation locks
//! - `ProfileLoader` - Seed context from a member's existing profile
//! - `GuidanceSynthesizer` - Prose guidance for an assessment

mod conversation_store;
mod guidance_synthesizer;
mod profile_loader;

pub use conversation_store::{ConversationHandle, ConversationStore, StoreError};
pub use guidance_synthesizer::{Guidance, GuidanceError, GuidanceRequest, GuidanceSynthesizer};
pub use profile_loader::{ProfileError, ProfileLoader};
