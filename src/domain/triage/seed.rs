//! Seed data handed over by the profile loader when a conversation opens.

use serde::{Deserialize, Serialize};

use super::context::{Severity, SymptomDuration};
use super::question::QuestionType;

/// Who the conversation is about, relative to the account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    #[default]
    Myself,
    Child,
    Partner,
    Parent,
    Other,
}

/// Pre-existing profile data plus entry-point metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedContext {
    pub chronic_conditions: Vec<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub age: Option<u8>,
    pub relationship: Option<Relationship>,
    /// Known when the flow was opened from a screen that already asked.
    pub duration: Option<SymptomDuration>,
    pub severity: Option<Severity>,
    /// Question types the caller already has answers for, in any order.
    pub skip_questions: Vec<QuestionType>,
    /// Where in the app the triage flow was opened from.
    pub entry_point: Option<String>,
}

impl SeedContext {
    pub fn is_about_child(&self) -> bool {
        matches!(self.relationship, Some(Relationship::Child)) || self.age.is_some_and(|age| age < 18)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_seed() {
        let seed: SeedContext = serde_json::from_str(
            r#"{"allergies": ["Penicillin"], "skip_questions": ["chronic_conditions"]}"#,
        )
        .unwrap();

        assert_eq!(seed.allergies, vec!["Penicillin".to_string()]);
        assert_eq!(seed.skip_questions, vec![QuestionType::ChronicConditions]);
        assert!(seed.duration.is_none());
    }

    #[test]
    fn minors_are_children() {
        let seed = SeedContext {
            age: Some(9),
            ..Default::default()
        };
        assert!(seed.is_about_child());
        assert!(!SeedContext::default().is_about_child());
    }
}
