//! Storage Adapters
//!
//! Implementations of the ConversationStore port.
//!
//! - **InMemoryConversationStore** - Live conversations held in process memory

mod in_memory_conversation_store;

pub use in_memory_conversation_store::InMemoryConversationStore;
