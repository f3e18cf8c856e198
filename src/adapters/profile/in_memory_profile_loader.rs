//! In-Memory Profile Loader Adapter
//!
//! Serves seed contexts from a map. Can be switched to "unavailable" to
//! exercise the degraded start path.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::MemberId;
use crate::domain::triage::SeedContext;
use crate::ports::{ProfileError, ProfileLoader};

#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileLoader {
    profiles: Arc<RwLock<HashMap<MemberId, SeedContext>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryProfileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: HashMap<MemberId, SeedContext>) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(profiles)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn insert(&self, member_id: MemberId, seed: SeedContext) {
        self.profiles.write().await.insert(member_id, seed);
    }

    /// Makes every subsequent load fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileLoader for InMemoryProfileLoader {
    async fn load_seed(&self, member_id: &MemberId) -> Result<SeedContext, ProfileError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProfileError::Unavailable("profile source offline".to_string()));
        }
        self.profiles
            .read()
            .await
            .get(member_id)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(member_id.clone()))
    }
}
