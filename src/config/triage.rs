//! Triage engine configuration

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::{ConfigError, ValidationError};
use crate::domain::conversation::{RandomPicker, TriageEngine};
use crate::domain::triage::{
    AssessmentThresholds, QuestionType, RedFlagTable, SequencerPolicy, ServiceCatalog, TableError,
    DEFAULT_MAX_RECOMMENDATIONS,
};

const MAX_RECOMMENDATIONS_LIMIT: usize = 10;

/// Triage engine configuration
///
/// Keyword tables and the service catalog default to the built-in ones;
/// set the `*_path` fields to load replacements from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct TriageConfig {
    /// Severity score at which the high band begins
    #[serde(default = "default_high_severity")]
    pub high_severity: u8,

    /// Severity score at which the moderate band begins
    #[serde(default = "default_moderate_severity")]
    pub moderate_severity: u8,

    /// Cap on follow-up questions per conversation
    pub max_questions: Option<usize>,

    /// Comma-separated question order, e.g. `severity,duration`
    pub question_priority: Option<String>,

    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Fixed seed for acknowledgment selection (reproducible transcripts)
    pub acknowledgment_seed: Option<u64>,

    pub red_flags_path: Option<PathBuf>,

    pub services_path: Option<PathBuf>,
}

impl TriageConfig {
    pub fn thresholds(&self) -> AssessmentThresholds {
        AssessmentThresholds {
            high: self.high_severity,
            moderate: self.moderate_severity,
        }
    }

    /// Builds the sequencer policy from the priority string and cap.
    pub fn policy(&self) -> Result<SequencerPolicy, ValidationError> {
        let priority = match &self.question_priority {
            Some(list) => parse_priority(list)?,
            None => QuestionType::DEFAULT_PRIORITY.to_vec(),
        };
        let policy = SequencerPolicy {
            priority,
            max_questions: self.max_questions,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.thresholds().validate()?;
        self.policy()?;
        if self.max_recommendations == 0 || self.max_recommendations > MAX_RECOMMENDATIONS_LIMIT {
            return Err(ValidationError::InvalidMaxRecommendations);
        }
        Ok(())
    }

    /// Assembles a [`TriageEngine`] from this configuration.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a setting is out of range
    /// - `TableLoad` if a configured YAML table cannot be read or parsed
    pub fn build_engine(&self) -> Result<TriageEngine, ConfigError> {
        self.validate()?;

        let red_flags = match &self.red_flags_path {
            Some(path) => load_table(path, |p| RedFlagTable::from_yaml_file(p))?,
            None => RedFlagTable::default(),
        };
        let catalog = match &self.services_path {
            Some(path) => load_table(path, |p| ServiceCatalog::from_yaml_file(p))?,
            None => ServiceCatalog::default(),
        };

        let mut engine = TriageEngine::new()
            .with_red_flags(red_flags)
            .with_thresholds(self.thresholds())
            .with_policy(self.policy()?)
            .with_catalog(catalog, self.max_recommendations);

        if let Some(seed) = self.acknowledgment_seed {
            engine = engine.with_picker(Arc::new(RandomPicker::seeded(seed)));
        }

        Ok(engine)
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            high_severity: default_high_severity(),
            moderate_severity: default_moderate_severity(),
            max_questions: None,
            question_priority: None,
            max_recommendations: default_max_recommendations(),
            acknowledgment_seed: None,
            red_flags_path: None,
            services_path: None,
        }
    }
}

fn load_table<T, F>(path: &Path, load: F) -> Result<T, ConfigError>
where
    F: FnOnce(&Path) -> Result<T, TableError>,
{
    load(path).map_err(|source| ConfigError::TableLoad {
        path: path.display().to_string(),
        source,
    })
}

fn parse_priority(list: &str) -> Result<Vec<QuestionType>, ValidationError> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            QuestionType::DEFAULT_PRIORITY
                .iter()
                .copied()
                .find(|q| q.as_str() == name)
                .ok_or_else(|| ValidationError::UnknownQuestionType(name.to_string()))
        })
        .collect()
}

fn default_high_severity() -> u8 {
    AssessmentThresholds::default().high
}

fn default_moderate_severity() -> u8 {
    AssessmentThresholds::default().moderate
}

fn default_max_recommendations() -> usize {
    DEFAULT_MAX_RECOMMENDATIONS
}
