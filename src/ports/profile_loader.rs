//! Profile Loader Port - supplies what is already known about a member.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId};
use crate::domain::triage::SeedContext;

/// Loads the seed context for a member's new conversation.
#[async_trait]
pub trait ProfileLoader: Send + Sync {
    /// # Errors
    ///
    /// - `NotFound` if the member has no profile
    /// - `Unavailable` if the profile source cannot be reached
    async fn load_seed(&self, member_id: &MemberId) -> Result<SeedContext, ProfileError>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("member not found: {0}")]
    NotFound(MemberId),

    #[error("profile source unavailable: {0}")]
    Unavailable(String),
}

impl From<ProfileError> for DomainError {
    fn from(err: ProfileError) -> Self {
        let code = match &err {
            ProfileError::NotFound(_) => ErrorCode::MemberNotFound,
            ProfileError::Unavailable(_) => ErrorCode::InternalError,
        };
        DomainError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_member_maps_to_member_not_found() {
        let member = MemberId::new("m-1").unwrap();
        let err: DomainError = ProfileError::NotFound(member).into();
        assert_eq!(err.code, ErrorCode::MemberNotFound);
    }
}
