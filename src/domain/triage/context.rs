//! The structured health context built up over a conversation.
//!
//! `HealthContext` is owned by a single conversation. Parsers never write to
//! it directly: they produce a [`ContextUpdate`] which is merged with
//! [`HealthContext::apply`]. The merge never replaces a value that is already
//! known, so a guess made from later free text cannot clobber an answer (or a
//! profile value) recorded earlier. List fields only ever grow.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::seed::SeedContext;

/// How long the user has had the primary symptom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomDuration {
    Today,
    FewDays,
    AboutAWeek,
    Weeks,
    Months,
}

/// Coarse grouping of durations used by the urgency decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBand {
    Acute,
    Subacute,
    Chronic,
}

impl SymptomDuration {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Started today",
            Self::FewDays => "1-3 days",
            Self::AboutAWeek => "About a week",
            Self::Weeks => "Several weeks",
            Self::Months => "Months or longer",
        }
    }

    pub fn band(&self) -> DurationBand {
        match self {
            Self::Today | Self::FewDays => DurationBand::Acute,
            Self::AboutAWeek => DurationBand::Subacute,
            Self::Weeks | Self::Months => DurationBand::Chronic,
        }
    }
}

/// How often the symptom occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Constant,
    ComesAndGoes,
    Occasional,
    FirstTime,
}

impl Frequency {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::ComesAndGoes => "Comes and goes",
            Self::Occasional => "Occasionally",
            Self::FirstTime => "First time it's happened",
        }
    }
}

/// Self-reported severity on a 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Creates a severity score.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` unless `1 <= score <= 10`.
    pub fn new(score: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&score) {
            return Err(ValidationError::out_of_range(
                "severity",
                Self::MIN as i32,
                Self::MAX as i32,
                score as i32,
            ));
        }
        Ok(Self(score))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Severity {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

/// A partial set of context fields extracted from one turn.
///
/// An empty update means the input carried no usable information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextUpdate {
    pub primary_symptom: Option<String>,
    pub duration: Option<SymptomDuration>,
    pub severity: Option<Severity>,
    pub frequency: Option<Frequency>,
    pub associated_symptoms: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub recent_events: Vec<String>,
    /// The user explicitly answered "none" to a list question.
    pub answered_none: bool,
}

impl ContextUpdate {
    /// Returns true if nothing was extracted (an explicit "none" counts as
    /// information).
    pub fn is_empty(&self) -> bool {
        !self.answered_none
            && self.primary_symptom.is_none()
            && self.duration.is_none()
            && self.severity.is_none()
            && self.frequency.is_none()
            && self.associated_symptoms.is_empty()
            && self.chronic_conditions.is_empty()
            && self.medications.is_empty()
            && self.allergies.is_empty()
            && self.recent_events.is_empty()
    }
}

/// Accumulated structured record of the user's symptoms and history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthContext {
    pub primary_symptom: String,
    pub duration: Option<SymptomDuration>,
    pub severity: Option<Severity>,
    pub frequency: Option<Frequency>,
    pub associated_symptoms: BTreeSet<String>,
    pub chronic_conditions: BTreeSet<String>,
    pub medications: BTreeSet<String>,
    pub allergies: BTreeSet<String>,
    pub recent_events: BTreeSet<String>,
    pub additional_notes: String,
}

impl HealthContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the starting context from what the profile loader already knows.
    pub fn from_seed(seed: &SeedContext) -> Self {
        Self {
            duration: seed.duration,
            severity: seed.severity,
            chronic_conditions: seed.chronic_conditions.iter().cloned().collect(),
            medications: seed.medications.iter().cloned().collect(),
            allergies: seed.allergies.iter().cloned().collect(),
            ..Self::default()
        }
    }

    pub fn has_primary_symptom(&self) -> bool {
        !self.primary_symptom.trim().is_empty()
    }

    /// Merges an update without overwriting anything already known.
    ///
    /// Returns true if at least one field changed.
    pub fn apply(&mut self, update: ContextUpdate) -> bool {
        let mut changed = false;

        if let Some(symptom) = update.primary_symptom {
            if !self.has_primary_symptom() && !symptom.trim().is_empty() {
                self.primary_symptom = symptom;
                changed = true;
            }
        }
        changed |= fill(&mut self.duration, update.duration);
        changed |= fill(&mut self.severity, update.severity);
        changed |= fill(&mut self.frequency, update.frequency);
        changed |= union(&mut self.associated_symptoms, update.associated_symptoms);
        changed |= union(&mut self.chronic_conditions, update.chronic_conditions);
        changed |= union(&mut self.medications, update.medications);
        changed |= union(&mut self.allergies, update.allergies);
        changed |= union(&mut self.recent_events, update.recent_events);

        changed
    }

    /// Appends free text the parsers could not place anywhere else.
    pub fn append_note(&mut self, note: &str) {
        let note = note.trim();
        if note.is_empty() {
            return;
        }
        if !self.additional_notes.is_empty() {
            self.additional_notes.push_str("; ");
        }
        self.additional_notes.push_str(note);
    }

    /// Lower-cased primary and associated symptoms, used for keyword scoring.
    pub fn symptom_text(&self) -> String {
        std::iter::once(self.primary_symptom.as_str())
            .chain(self.associated_symptoms.iter().map(String::as_str))
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match (slot.is_none(), value) {
        (true, Some(value)) => {
            *slot = Some(value);
            true
        }
        _ => false,
    }
}

fn union(set: &mut BTreeSet<String>, values: Vec<String>) -> bool {
    let mut changed = false;
    for value in values {
        let value = value.trim();
        if !value.is_empty() {
            changed |= set.insert(value.to_string());
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    mod severity {
        use super::*;

        #[test]
        fn accepts_one_through_ten() {
            assert!(Severity::new(1).is_ok());
            assert!(Severity::new(10).is_ok());
        }

        #[test]
        fn rejects_out_of_range() {
            assert!(Severity::new(0).is_err());
            assert!(Severity::new(11).is_err());
        }

        #[test]
        fn serializes_as_plain_number() {
            let json = serde_json::to_string(&Severity::new(7).unwrap()).unwrap();
            assert_eq!(json, "7");
            assert!(serde_json::from_str::<Severity>("42").is_err());
        }
    }

    mod duration {
        use super::*;

        #[test]
        fn bands_group_durations() {
            assert_eq!(SymptomDuration::Today.band(), DurationBand::Acute);
            assert_eq!(SymptomDuration::FewDays.band(), DurationBand::Acute);
            assert_eq!(SymptomDuration::AboutAWeek.band(), DurationBand::Subacute);
            assert_eq!(SymptomDuration::Months.band(), DurationBand::Chronic);
        }
    }

    mod apply {
        use super::*;

        #[test]
        fn fills_unknown_fields() {
            let mut ctx = HealthContext::new();
            let changed = ctx.apply(ContextUpdate {
                primary_symptom: Some("Headache".to_string()),
                duration: Some(SymptomDuration::FewDays),
                ..Default::default()
            });

            assert!(changed);
            assert_eq!(ctx.primary_symptom, "Headache");
            assert_eq!(ctx.duration, Some(SymptomDuration::FewDays));
        }

        #[test]
        fn never_overwrites_known_scalars() {
            let mut ctx = HealthContext::new();
            ctx.severity = Some(Severity::new(3).unwrap());
            ctx.primary_symptom = "Rash".to_string();

            let changed = ctx.apply(ContextUpdate {
                primary_symptom: Some("Itching".to_string()),
                severity: Some(Severity::new(9).unwrap()),
                ..Default::default()
            });

            assert!(!changed);
            assert_eq!(ctx.primary_symptom, "Rash");
            assert_eq!(ctx.severity.unwrap().value(), 3);
        }

        #[test]
        fn unions_list_fields() {
            let mut ctx = HealthContext::new();
            ctx.chronic_conditions.insert("Asthma".to_string());

            ctx.apply(ContextUpdate {
                chronic_conditions: vec!["Diabetes".to_string(), "Asthma".to_string()],
                ..Default::default()
            });

            assert_eq!(ctx.chronic_conditions.len(), 2);
            assert!(ctx.chronic_conditions.contains("Asthma"));
        }

        #[test]
        fn explicit_none_is_not_empty() {
            let update = ContextUpdate {
                answered_none: true,
                ..Default::default()
            };
            assert!(!update.is_empty());
            assert!(ContextUpdate::default().is_empty());
        }
    }

    #[test]
    fn seed_populates_profile_fields() {
        let seed = SeedContext {
            chronic_conditions: vec!["Hypertension".to_string()],
            medications: vec!["Lisinopril".to_string()],
            duration: Some(SymptomDuration::Weeks),
            ..Default::default()
        };
        let ctx = HealthContext::from_seed(&seed);

        assert!(ctx.chronic_conditions.contains("Hypertension"));
        assert!(ctx.medications.contains("Lisinopril"));
        assert_eq!(ctx.duration, Some(SymptomDuration::Weeks));
        assert!(ctx.severity.is_none());
    }

    #[test]
    fn notes_are_joined() {
        let mut ctx = HealthContext::new();
        ctx.append_note("worse at night");
        ctx.append_note("  ");
        ctx.append_note("had it last winter too");
        assert_eq!(ctx.additional_notes, "worse at night; had it last winter too");
    }

    #[test]
    fn symptom_text_joins_primary_and_associated() {
        let mut ctx = HealthContext::new();
        ctx.primary_symptom = "Sore Throat".to_string();
        ctx.associated_symptoms.insert("Fever".to_string());
        assert_eq!(ctx.symptom_text(), "sore throat fever");
    }
}
