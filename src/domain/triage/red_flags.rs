//! Red-flag / emergency classifier.
//!
//! Scans normalized (lower-cased, trimmed) user text for phrases that point
//! at a potentially life-threatening condition. Matching is plain substring
//! search over an ordered [`RedFlagTable`]; the classifier keeps no state
//! between calls, so every turn is judged on its own text.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::TableError;
use super::urgency::UrgencyLevel;

/// One symptom category in the red-flag table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlagRule {
    /// Stable identifier, e.g. `cardiac`.
    pub id: String,
    pub label: String,
    /// Lower-case phrases matched as substrings.
    pub keywords: Vec<String>,
    /// Urgency this category implies; `emergency` short-circuits the flow.
    pub urgency: UrgencyLevel,
    /// What to tell the user when this category fires.
    pub advice: String,
}

impl RedFlagRule {
    pub fn is_emergency(&self) -> bool {
        self.urgency == UrgencyLevel::Emergency
    }

    fn new(
        id: &str,
        label: &str,
        urgency: UrgencyLevel,
        advice: &str,
        keywords: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            urgency,
            advice: advice.to_string(),
        }
    }
}

/// Ordered set of red-flag categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlagTable {
    pub rules: Vec<RedFlagRule>,
}

const CALL_EMERGENCY: &str = "Call emergency services (911) or go to the nearest emergency room now.";

impl Default for RedFlagTable {
    fn default() -> Self {
        use UrgencyLevel::{Emergency, Urgent};

        Self {
            rules: vec![
                RedFlagRule::new(
                    "cardiac",
                    "Possible heart problem",
                    Emergency,
                    "Call emergency services (911) now. If you are not allergic, chew an aspirin while you wait.",
                    &[
                        "chest pain",
                        "chest pressure",
                        "chest tightness",
                        "crushing pain",
                        "heart attack",
                        "pain in my left arm",
                        "pain spreading to my jaw",
                    ],
                ),
                RedFlagRule::new(
                    "neurological",
                    "Possible stroke or neurological emergency",
                    Emergency,
                    "Call emergency services (911) now and note the time symptoms started.",
                    &[
                        "face drooping",
                        "slurred speech",
                        "sudden weakness",
                        "numbness on one side",
                        "worst headache of my life",
                        "sudden confusion",
                        "seizure",
                        "unconscious",
                        "unresponsive",
                        "passed out",
                    ],
                ),
                RedFlagRule::new(
                    "respiratory",
                    "Severe breathing difficulty",
                    Emergency,
                    CALL_EMERGENCY,
                    &[
                        "can't breathe",
                        "cannot breathe",
                        "difficulty breathing",
                        "struggling to breathe",
                        "gasping for air",
                        "choking",
                        "lips turning blue",
                    ],
                ),
                RedFlagRule::new(
                    "bleeding",
                    "Severe bleeding",
                    Emergency,
                    "Apply firm pressure to the wound and call emergency services (911).",
                    &[
                        "won't stop bleeding",
                        "bleeding heavily",
                        "heavy bleeding",
                        "vomiting blood",
                        "coughing up blood",
                    ],
                ),
                RedFlagRule::new(
                    "trauma",
                    "Serious injury",
                    Emergency,
                    CALL_EMERGENCY,
                    &[
                        "bone sticking out",
                        "hit by a car",
                        "car accident",
                        "fell from a height",
                        "severe burn",
                        "head injury",
                    ],
                ),
                RedFlagRule::new(
                    "anaphylaxis",
                    "Severe allergic reaction",
                    Emergency,
                    "Use an epinephrine auto-injector if you have one and call emergency services (911).",
                    &[
                        "anaphylaxis",
                        "throat closing",
                        "throat swelling",
                        "tongue swelling",
                        "swollen tongue",
                    ],
                ),
                RedFlagRule::new(
                    "mental_health_crisis",
                    "Mental health crisis",
                    Emergency,
                    "You don't have to go through this alone. Call or text 988 to reach the Suicide & Crisis Lifeline, or call 911 if you are in immediate danger.",
                    &[
                        "suicide",
                        "suicidal",
                        "kill myself",
                        "end my life",
                        "want to die",
                        "hurt myself",
                        "self-harm",
                    ],
                ),
                RedFlagRule::new(
                    "poisoning",
                    "Possible poisoning or overdose",
                    Emergency,
                    "Call Poison Control (1-800-222-1222) or emergency services (911) now.",
                    &["overdose", "poisoning", "swallowed bleach", "took too many pills"],
                ),
                RedFlagRule::new(
                    "infection_warning",
                    "Signs of a serious infection",
                    Urgent,
                    "These symptoms should be checked by a clinician today.",
                    &["stiff neck", "high fever", "fever and rash", "confused and feverish"],
                ),
                RedFlagRule::new(
                    "abdominal_warning",
                    "Abdominal warning signs",
                    Urgent,
                    "These symptoms should be checked by a clinician today.",
                    &[
                        "severe abdominal pain",
                        "severe stomach pain",
                        "blood in stool",
                        "black stool",
                        "rigid stomach",
                    ],
                ),
            ],
        }
    }
}

impl RedFlagTable {
    /// Parses a table from YAML and normalizes its keywords.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TableError> {
        let table: RedFlagTable = serde_yaml::from_str(yaml)?;
        table.normalized()
    }

    /// Reads a YAML table from disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    fn normalized(mut self) -> Result<Self, TableError> {
        if self.rules.is_empty() {
            return Err(TableError::Invalid("red flag table has no rules".to_string()));
        }
        for rule in &mut self.rules {
            rule.keywords = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            if rule.keywords.is_empty() {
                return Err(TableError::Invalid(format!(
                    "red flag rule '{}' has no keywords",
                    rule.id
                )));
            }
        }
        Ok(self)
    }

    pub fn rule(&self, id: &str) -> Option<&RedFlagRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }
}

/// Result of scanning one piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlagDetection {
    pub is_emergency: bool,
    /// Matched keywords in table order.
    pub detected_symptoms: Vec<String>,
    pub matched_rules: Vec<RedFlagRule>,
}

impl RedFlagDetection {
    pub fn is_clear(&self) -> bool {
        self.matched_rules.is_empty()
    }

    /// Most urgent level among the matched categories.
    pub fn highest_urgency(&self) -> Option<UrgencyLevel> {
        self.matched_rules.iter().map(|rule| rule.urgency).max()
    }

    /// Identifiers of the matched categories, for logging.
    pub fn rule_ids(&self) -> Vec<&str> {
        self.matched_rules.iter().map(|rule| rule.id.as_str()).collect()
    }

    /// Advice for the user from the first matched emergency category.
    pub fn emergency_advice(&self) -> Option<&str> {
        self.matched_rules
            .iter()
            .find(|rule| rule.is_emergency())
            .map(|rule| rule.advice.as_str())
    }
}

/// Substring classifier over a [`RedFlagTable`].
#[derive(Debug, Clone, Default)]
pub struct RedFlagClassifier {
    table: RedFlagTable,
}

impl RedFlagClassifier {
    pub fn new(table: RedFlagTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RedFlagTable {
        &self.table
    }

    /// Scans already-normalized text.
    pub fn detect(&self, normalized_text: &str) -> RedFlagDetection {
        let mut detection = RedFlagDetection::default();
        if normalized_text.is_empty() {
            return detection;
        }

        for rule in &self.table.rules {
            let hits: Vec<&String> = rule
                .keywords
                .iter()
                .filter(|keyword| normalized_text.contains(keyword.as_str()))
                .collect();
            if hits.is_empty() {
                continue;
            }

            for keyword in hits {
                if !detection.detected_symptoms.contains(keyword) {
                    detection.detected_symptoms.push(keyword.clone());
                }
            }
            detection.is_emergency |= rule.is_emergency();
            detection.matched_rules.push(rule.clone());
        }

        detection
    }

    /// Scans several pieces of text independently and merges the results.
    ///
    /// Texts are not concatenated, so a phrase split across two turns does
    /// not produce a match.
    pub fn detect_all<'a, I>(&self, texts: I) -> RedFlagDetection
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut hit_rules: Vec<bool> = vec![false; self.table.rules.len()];
        let mut hit_keywords: Vec<&str> = Vec::new();

        for text in texts {
            for (index, rule) in self.table.rules.iter().enumerate() {
                for keyword in &rule.keywords {
                    if text.contains(keyword.as_str()) {
                        hit_rules[index] = true;
                        if !hit_keywords.contains(&keyword.as_str()) {
                            hit_keywords.push(keyword.as_str());
                        }
                    }
                }
            }
        }

        // Rebuild in table order so the output does not depend on turn order.
        let mut detection = RedFlagDetection::default();
        for (index, rule) in self.table.rules.iter().enumerate() {
            if !hit_rules[index] {
                continue;
            }
            for keyword in &rule.keywords {
                if hit_keywords.contains(&keyword.as_str())
                    && !detection.detected_symptoms.contains(keyword)
                {
                    detection.detected_symptoms.push(keyword.clone());
                }
            }
            detection.is_emergency |= rule.is_emergency();
            detection.matched_rules.push(rule.clone());
        }
        detection
    }
}

/// Lower-cases and trims raw user input; collapses internal whitespace.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .replace('\u{2019}', "'")
}
