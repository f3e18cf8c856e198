//! Follow-up question types, their prompts and quick-reply options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A follow-up question the triage flow can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Duration,
    Severity,
    Frequency,
    AssociatedSymptoms,
    RecentEvents,
    ChronicConditions,
}

impl QuestionType {
    /// Default asking order, most important first.
    pub const DEFAULT_PRIORITY: [QuestionType; 6] = [
        Self::Duration,
        Self::Severity,
        Self::Frequency,
        Self::AssociatedSymptoms,
        Self::RecentEvents,
        Self::ChronicConditions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::Severity => "severity",
            Self::Frequency => "frequency",
            Self::AssociatedSymptoms => "associated_symptoms",
            Self::RecentEvents => "recent_events",
            Self::ChronicConditions => "chronic_conditions",
        }
    }

    /// The question shown to the user.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Duration => "How long have you had this?",
            Self::Severity => "On a scale of 1 to 10, how bad is it right now?",
            Self::Frequency => "Is it there all the time, or does it come and go?",
            Self::AssociatedSymptoms => "Have you noticed any other symptoms along with it?",
            Self::RecentEvents => {
                "Has anything happened recently that might be related, like travel, an injury or a new medication?"
            }
            Self::ChronicConditions => "Do you have any ongoing health conditions?",
        }
    }

    /// Labels rendered as quick-reply buttons.
    pub fn quick_options(&self) -> &'static [&'static str] {
        match self {
            Self::Duration => &[
                "Started today",
                "1-3 days",
                "About a week",
                "Several weeks",
                "Months or longer",
            ],
            Self::Severity => &["Mild (1-4)", "Moderate (5-7)", "Severe (8-10)"],
            Self::Frequency => &[
                "Constant",
                "Comes and goes",
                "Occasionally",
                "First time it's happened",
            ],
            Self::AssociatedSymptoms => &[
                "Fever",
                "Nausea or vomiting",
                "Dizziness",
                "Fatigue",
                "None of these",
            ],
            Self::RecentEvents => &[
                "Recent travel",
                "Injury or fall",
                "New medication",
                "Been around someone sick",
                "Nothing like that",
            ],
            Self::ChronicConditions => &[
                "Diabetes",
                "Heart disease",
                "Asthma or COPD",
                "High blood pressure",
                "None",
            ],
        }
    }

    /// Returns true for questions whose answer is a list of items.
    pub fn is_multi_select(&self) -> bool {
        matches!(
            self,
            Self::AssociatedSymptoms | Self::RecentEvents | Self::ChronicConditions
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
