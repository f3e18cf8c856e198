//! Guidance request and response exchanged with the prose synthesizer.

use serde::{Deserialize, Serialize};

use crate::domain::triage::{HealthContext, Relationship, UrgencyLevel};

/// Everything the synthesizer may use to write guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceRequest {
    pub urgency: UrgencyLevel,
    pub context: HealthContext,
    pub red_flags: Vec<String>,
    /// Informational only; never changes the urgency.
    pub age: Option<u8>,
    pub relationship: Option<Relationship>,
}

impl GuidanceRequest {
    pub fn primary_symptom(&self) -> &str {
        self.context.primary_symptom.trim()
    }
}

/// Prose guidance for the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guidance {
    pub possible_causes: Vec<String>,
    pub immediate_actions: Vec<String>,
    /// One warning sign or escalation step per entry.
    pub when_to_seek_help: Vec<String>,
}

impl Guidance {
    pub fn is_empty(&self) -> bool {
        self.possible_causes.is_empty()
            && self.immediate_actions.is_empty()
            && self.when_to_seek_help.iter().all(|line| line.trim().is_empty())
    }
}
