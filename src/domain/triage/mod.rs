//! Triage domain: red flags, context parsing, follow-up questions, urgency
//! assessment and care routing.
//!
//! Everything here is synchronous and free of I/O apart from the optional
//! YAML loaders for the red-flag table and the service catalog.

mod assessor;
mod context;
mod errors;
mod parser;
mod question;
mod red_flags;
mod router;
mod seed;
mod sequencer;
mod urgency;

pub use assessor::{AssessmentThresholds, SafetyAssessment, UrgencyAssessor};
pub use context::{ContextUpdate, DurationBand, Frequency, HealthContext, Severity, SymptomDuration};
pub use errors::{TableError, TriageError};
pub use parser::ContextParser;
pub use question::QuestionType;
pub use red_flags::{normalize, RedFlagClassifier, RedFlagDetection, RedFlagRule, RedFlagTable};
pub use router::{
    prefilled_notes, ServiceCatalog, ServiceDefinition, ServiceRecommendation, ServiceRouter,
    DEFAULT_MAX_RECOMMENDATIONS,
};
pub use seed::{Relationship, SeedContext};
pub use sequencer::{QuestionSequencer, QuestionsAsked, SequencerPolicy};
pub use urgency::UrgencyLevel;
