//! Care-service routing.
//!
//! Filters the service catalog by urgency, scores each candidate by catalog
//! priority plus symptom keyword matches and keeps the best few.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::context::HealthContext;
use super::errors::TableError;
use super::urgency::UrgencyLevel;

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 3;

/// One care service the router can recommend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub id: String,
    pub title: String,
    /// Urgency levels this service is appropriate for.
    pub urgency_levels: Vec<UrgencyLevel>,
    /// Lower-case phrases that make this service a better fit.
    #[serde(default)]
    pub symptom_keywords: Vec<String>,
    /// 0 is the most preferred.
    pub priority: u8,
    /// Reason shown to the user; `{symptom}` is replaced.
    pub reason_template: String,
}

impl ServiceDefinition {
    fn new(
        id: &str,
        title: &str,
        priority: u8,
        urgency_levels: &[UrgencyLevel],
        symptom_keywords: &[&str],
        reason_template: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            urgency_levels: urgency_levels.to_vec(),
            symptom_keywords: symptom_keywords.iter().map(|k| k.to_string()).collect(),
            priority,
            reason_template: reason_template.to_string(),
        }
    }

    pub fn serves(&self, urgency: UrgencyLevel) -> bool {
        self.urgency_levels.contains(&urgency)
    }

    fn keyword_matches(&self, symptom_text: &str) -> usize {
        self.symptom_keywords
            .iter()
            .filter(|keyword| symptom_text.contains(keyword.as_str()))
            .count()
    }

    fn score(&self, symptom_text: &str) -> i32 {
        (10 - i32::from(self.priority)) + 5 * self.keyword_matches(symptom_text) as i32
    }

    fn reason(&self, context: &HealthContext) -> String {
        let symptom = if context.has_primary_symptom() {
            context.primary_symptom.trim().to_lowercase()
        } else {
            "your symptoms".to_string()
        };
        self.reason_template.replace("{symptom}", &symptom)
    }
}

/// Ordered list of services. Declaration order breaks score ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalog {
    pub services: Vec<ServiceDefinition>,
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        use UrgencyLevel::*;

        Self {
            services: vec![
                ServiceDefinition::new(
                    "emergency_services",
                    "Call 911",
                    0,
                    &[Emergency],
                    &[],
                    "Emergency responders can reach you fastest and start treating {symptom} on the way.",
                ),
                ServiceDefinition::new(
                    "emergency_room",
                    "Nearest emergency room",
                    1,
                    &[Emergency],
                    &["bleeding", "injury", "burn", "broken", "fracture", "accident"],
                    "An emergency room can assess {symptom} immediately.",
                ),
                ServiceDefinition::new(
                    "crisis_line",
                    "988 Suicide & Crisis Lifeline",
                    1,
                    &[Emergency],
                    &["suicid", "kill myself", "want to die", "end my life", "hurt myself", "self-harm"],
                    "Trained counselors are available around the clock to talk right now.",
                ),
                ServiceDefinition::new(
                    "urgent_care",
                    "Urgent care clinic",
                    2,
                    &[Urgent, Soon],
                    &["cut", "sprain", "fever", "burn", "injury", "infection", "ear", "throat"],
                    "Urgent care can see you today for {symptom} without an appointment.",
                ),
                ServiceDefinition::new(
                    "telehealth",
                    "Video visit",
                    3,
                    &[Soon, NonUrgent, Monitor],
                    &["rash", "cough", "cold", "sore throat", "pink eye", "allergy", "urinary"],
                    "A clinician can look at {symptom} over video, often within the hour.",
                ),
                ServiceDefinition::new(
                    "primary_care",
                    "Primary care appointment",
                    3,
                    &[Soon, NonUrgent, Monitor],
                    &["back pain", "joint", "fatigue", "blood pressure", "diabetes", "weight"],
                    "Your primary care provider can follow up on {symptom} and your history.",
                ),
                ServiceDefinition::new(
                    "mental_health",
                    "Mental health support",
                    3,
                    &[Soon, NonUrgent, Monitor],
                    &["anxiety", "anxious", "depress", "stress", "panic", "sleep", "mood"],
                    "A mental health professional can help with {symptom}.",
                ),
                ServiceDefinition::new(
                    "nurse_line",
                    "24/7 nurse line",
                    4,
                    &[Urgent, Soon, NonUrgent, Monitor, SelfCare],
                    &[],
                    "A nurse can talk through {symptom} with you any time, day or night.",
                ),
                ServiceDefinition::new(
                    "pharmacy",
                    "Pharmacist consultation",
                    5,
                    &[Monitor, SelfCare],
                    &["cold", "allergy", "heartburn", "headache", "cough", "congestion"],
                    "A pharmacist can recommend over-the-counter options for {symptom}.",
                ),
                ServiceDefinition::new(
                    "self_care",
                    "Self-care guide",
                    6,
                    &[Monitor, SelfCare],
                    &[],
                    "Step-by-step home care for {symptom}, and signs to watch for.",
                ),
            ],
        }
    }
}

impl ServiceCatalog {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TableError> {
        let catalog: ServiceCatalog = serde_yaml::from_str(yaml)?;
        catalog.normalized()
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    fn normalized(mut self) -> Result<Self, TableError> {
        if self.services.is_empty() {
            return Err(TableError::Invalid("service catalog is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for service in &mut self.services {
            if !seen.insert(service.id.clone()) {
                return Err(TableError::Invalid(format!("duplicate service id '{}'", service.id)));
            }
            if service.urgency_levels.is_empty() {
                return Err(TableError::Invalid(format!(
                    "service '{}' has no urgency levels",
                    service.id
                )));
            }
            if service.priority > 10 {
                return Err(TableError::Invalid(format!(
                    "service '{}' priority must be 0-10",
                    service.id
                )));
            }
            service.symptom_keywords = service
                .symptom_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
        }
        Ok(self)
    }

    pub fn service(&self, id: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|service| service.id == id)
    }
}

/// A recommended service, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecommendation {
    pub service_id: String,
    pub title: String,
    pub reason: String,
    pub urgency: UrgencyLevel,
    /// Hand-off summary for the receiving clinician.
    pub prefilled_notes: String,
}

#[derive(Debug, Clone)]
pub struct ServiceRouter {
    catalog: ServiceCatalog,
    max_results: usize,
}

impl Default for ServiceRouter {
    fn default() -> Self {
        Self::new(ServiceCatalog::default(), DEFAULT_MAX_RECOMMENDATIONS)
    }
}

impl ServiceRouter {
    pub fn new(catalog: ServiceCatalog, max_results: usize) -> Self {
        Self { catalog, max_results }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Best services for this urgency, most suitable first.
    pub fn recommend(&self, context: &HealthContext, urgency: UrgencyLevel) -> Vec<ServiceRecommendation> {
        let symptom_text = context.symptom_text();

        let mut candidates: Vec<(i32, &ServiceDefinition)> = self
            .catalog
            .services
            .iter()
            .filter(|service| service.serves(urgency))
            .map(|service| (service.score(&symptom_text), service))
            .collect();
        // sort_by is stable: equal scores keep catalog order.
        candidates.sort_by(|a, b| b.0.cmp(&a.0));

        let notes = prefilled_notes(context);
        candidates
            .into_iter()
            .take(self.max_results)
            .map(|(_, service)| ServiceRecommendation {
                service_id: service.id.clone(),
                title: service.title.clone(),
                reason: service.reason(context),
                urgency,
                prefilled_notes: notes.clone(),
            })
            .collect()
    }
}

/// Clinician-facing summary of the context, one line per known field.
pub fn prefilled_notes(context: &HealthContext) -> String {
    let mut lines = Vec::new();

    if context.has_primary_symptom() {
        lines.push(format!("Chief complaint: {}", context.primary_symptom.trim()));
    }
    if let Some(duration) = context.duration {
        lines.push(format!("Duration: {}", duration.label()));
    }
    if let Some(severity) = context.severity {
        lines.push(format!("Severity: {}", severity));
    }
    if let Some(frequency) = context.frequency {
        lines.push(format!("Frequency: {}", frequency.label()));
    }

    let lists = [
        ("Associated symptoms", &context.associated_symptoms),
        ("Chronic conditions", &context.chronic_conditions),
        ("Medications", &context.medications),
        ("Allergies", &context.allergies),
        ("Recent events", &context.recent_events),
    ];
    for (label, values) in lists {
        if !values.is_empty() {
            let joined: Vec<&str> = values.iter().map(String::as_str).collect();
            lines.push(format!("{}: {}", label, joined.join(", ")));
        }
    }

    if !context.additional_notes.trim().is_empty() {
        lines.push(format!("Notes: {}", context.additional_notes.trim()));
    }

    lines.join("\n")
}
