//! Urgency levels for care routing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How soon the user should get care.
///
/// Variants are declared from least to most urgent so the derived `Ord`
/// gives `Emergency > Urgent > Soon > NonUrgent > Monitor > SelfCare`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    /// Can be handled at home.
    #[default]
    SelfCare,
    /// Watch for changes before seeking care.
    Monitor,
    /// Book a routine appointment.
    NonUrgent,
    /// Should be seen within a day or two.
    Soon,
    /// Should be seen today.
    Urgent,
    /// Needs emergency services now.
    Emergency,
}

impl UrgencyLevel {
    /// All levels, least urgent first.
    pub const ALL: [UrgencyLevel; 6] = [
        Self::SelfCare,
        Self::Monitor,
        Self::NonUrgent,
        Self::Soon,
        Self::Urgent,
        Self::Emergency,
    ];

    /// Returns the snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfCare => "self_care",
            Self::Monitor => "monitor",
            Self::NonUrgent => "non_urgent",
            Self::Soon => "soon",
            Self::Urgent => "urgent",
            Self::Emergency => "emergency",
        }
    }

    /// Returns a label suitable for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SelfCare => "Self-care",
            Self::Monitor => "Monitor",
            Self::NonUrgent => "Non-urgent",
            Self::Soon => "See someone soon",
            Self::Urgent => "Urgent",
            Self::Emergency => "Emergency",
        }
    }

    /// Returns a one-sentence summary of what this level means for the user.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::SelfCare => "This can most likely be managed at home with self-care.",
            Self::Monitor => "Keep an eye on how this develops over the next day or two.",
            Self::NonUrgent => "It's worth booking a routine appointment to get this checked.",
            Self::Soon => "You should be seen by a clinician within the next day or two.",
            Self::Urgent => "You should be seen by a clinician today.",
            Self::Emergency => "This needs emergency care right now.",
        }
    }

    /// Returns true if the user should be seen the same day.
    pub fn is_same_day(&self) -> bool {
        matches!(self, Self::Urgent | Self::Emergency)
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("urgency", format!("unknown level '{}'", s)))
    }
}
