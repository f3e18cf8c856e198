//! Adapters - Implementations of port interfaces.
//!
//! - `storage` - Conversation store (in-memory)
//! - `profile` - Profile loader (in-memory)
//! - `guidance` - Guidance synthesizers (template, mock)

pub mod guidance;
pub mod profile;
pub mod storage;

pub use guidance::{MockGuidanceSynthesizer, TemplateGuidanceSynthesizer};
pub use profile::InMemoryProfileLoader;
pub use storage::InMemoryConversationStore;
