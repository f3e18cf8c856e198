//! Mock Guidance Synthesizer for testing.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let synthesizer = MockGuidanceSynthesizer::new()
//!     .with_error(GuidanceError::Unavailable("down".into()))
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{Guidance, GuidanceError, GuidanceRequest, GuidanceSynthesizer};

#[derive(Debug, Clone, Default)]
pub struct MockGuidanceSynthesizer {
    responses: Arc<Mutex<VecDeque<Result<Guidance, GuidanceError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<GuidanceRequest>>>,
}

impl MockGuidanceSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn with_guidance(self, guidance: Guidance) -> Self {
        lock(&self.responses).push_back(Ok(guidance));
        self
    }

    /// Queues an error response.
    pub fn with_error(self, error: GuidanceError) -> Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<GuidanceRequest> {
        lock(&self.calls).clone()
    }

    fn next_response(&self) -> Result<Guidance, GuidanceError> {
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Ok(Guidance {
                possible_causes: vec!["Mock cause".to_string()],
                immediate_actions: vec!["Mock action".to_string()],
                when_to_seek_help: vec!["Mock advice".to_string()],
            })
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl GuidanceSynthesizer for MockGuidanceSynthesizer {
    async fn synthesize(&self, request: &GuidanceRequest) -> Result<Guidance, GuidanceError> {
        lock(&self.calls).push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::{HealthContext, UrgencyLevel};

    fn request() -> GuidanceRequest {
        GuidanceRequest {
            urgency: UrgencyLevel::Monitor,
            context: HealthContext::new(),
            red_flags: vec![],
            age: None,
            relationship: None,
        }
    }

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let mock = MockGuidanceSynthesizer::new()
            .with_error(GuidanceError::Unavailable("down".to_string()))
            .with_guidance(Guidance::default());

        assert!(mock.synthesize(&request()).await.is_err());
        assert_eq!(mock.synthesize(&request()).await, Ok(Guidance::default()));
        assert_eq!(
            mock.synthesize(&request()).await.unwrap().when_to_seek_help,
            vec!["Mock advice".to_string()]
        );
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn clones_share_call_history() {
        let mock = MockGuidanceSynthesizer::new();
        let clone = mock.clone();
        clone.synthesize(&request()).await.unwrap();
        assert_eq!(mock.get_calls().len(), 1);
    }
}
