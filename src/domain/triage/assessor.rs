//! Urgency assessment.
//!
//! Combines a severity/duration decision table with a rescan of everything
//! the user has typed. The result is the more urgent of the two.

use serde::{Deserialize, Serialize};

use super::context::{DurationBand, HealthContext, SymptomDuration};
use super::red_flags::{RedFlagClassifier, RedFlagRule};
use super::urgency::UrgencyLevel;
use crate::domain::foundation::ValidationError;

/// Severity scores at which the high and moderate bands begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentThresholds {
    pub high: u8,
    pub moderate: u8,
}

impl Default for AssessmentThresholds {
    fn default() -> Self {
        Self { high: 8, moderate: 5 }
    }
}

impl AssessmentThresholds {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=10).contains(&self.high) {
            return Err(ValidationError::out_of_range("high", 1, 10, self.high as i32));
        }
        if !(1..=10).contains(&self.moderate) {
            return Err(ValidationError::out_of_range("moderate", 1, 10, self.moderate as i32));
        }
        if self.moderate >= self.high {
            return Err(ValidationError::invalid_format(
                "moderate",
                "must be below the high threshold",
            ));
        }
        Ok(())
    }

    fn band(&self, score: u8) -> SeverityBand {
        if score >= self.high {
            SeverityBand::High
        } else if score >= self.moderate {
            SeverityBand::Moderate
        } else {
            SeverityBand::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeverityBand {
    High,
    Moderate,
    Low,
}

/// Output of an assessment. Computed once per conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyAssessment {
    pub urgency: UrgencyLevel,
    /// Red-flag phrases found anywhere in the conversation.
    pub red_flags_detected: Vec<String>,
    pub matched_rules: Vec<RedFlagRule>,
}

impl SafetyAssessment {
    pub fn is_emergency(&self) -> bool {
        self.urgency == UrgencyLevel::Emergency
    }
}

#[derive(Debug, Clone, Default)]
pub struct UrgencyAssessor {
    thresholds: AssessmentThresholds,
    classifier: RedFlagClassifier,
}

impl UrgencyAssessor {
    pub fn new(thresholds: AssessmentThresholds, classifier: RedFlagClassifier) -> Self {
        Self { thresholds, classifier }
    }

    pub fn thresholds(&self) -> &AssessmentThresholds {
        &self.thresholds
    }

    /// Assesses a context against the full free-text history.
    ///
    /// `history` holds every normalized user text of the conversation. Each
    /// entry is scanned on its own.
    pub fn assess<S: AsRef<str>>(&self, context: &HealthContext, history: &[S]) -> SafetyAssessment {
        let table_urgency = self.table_urgency(context);
        let detection = self
            .classifier
            .detect_all(history.iter().map(|text| text.as_ref()));

        let urgency = detection
            .highest_urgency()
            .map_or(table_urgency, |flagged| flagged.max(table_urgency));

        SafetyAssessment {
            urgency,
            red_flags_detected: detection.detected_symptoms,
            matched_rules: detection.matched_rules,
        }
    }

    /// Urgency from severity and duration alone.
    pub fn table_urgency(&self, context: &HealthContext) -> UrgencyLevel {
        let severity = context.severity.map(|s| self.thresholds.band(s.value()));
        let band = context.duration.map(|d| d.band());

        match (severity, band) {
            (Some(SeverityBand::High), _) => UrgencyLevel::Urgent,
            (Some(SeverityBand::Moderate), Some(DurationBand::Chronic)) => UrgencyLevel::NonUrgent,
            (Some(SeverityBand::Moderate), _) => UrgencyLevel::Soon,
            (Some(SeverityBand::Low), Some(DurationBand::Acute)) => {
                if context.duration == Some(SymptomDuration::Today) {
                    UrgencyLevel::SelfCare
                } else {
                    UrgencyLevel::Monitor
                }
            }
            (Some(SeverityBand::Low), Some(_)) => UrgencyLevel::NonUrgent,
            (Some(SeverityBand::Low), None) => UrgencyLevel::Monitor,
            (None, Some(DurationBand::Chronic)) => UrgencyLevel::NonUrgent,
            (None, _) => UrgencyLevel::Monitor,
        }
    }
}
