//! Profile Adapters
//!
//! - **InMemoryProfileLoader** - Seed contexts from an in-process map

mod in_memory_profile_loader;

pub use in_memory_profile_loader::InMemoryProfileLoader;
