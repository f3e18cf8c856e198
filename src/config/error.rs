//! Configuration error types

use thiserror::Error;

use crate::domain::foundation::ValidationError as DomainValidationError;
use crate::domain::triage::TableError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to load table from {path}: {source}")]
    TableLoad {
        path: String,
        #[source]
        source: TableError,
    },
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid triage setting: {0}")]
    InvalidTriage(#[from] DomainValidationError),

    #[error("Unknown question type in priority list: {0}")]
    UnknownQuestionType(String),

    #[error("max_recommendations must be between 1 and 10")]
    InvalidMaxRecommendations,

    #[error("Invalid guidance timeout")]
    InvalidTimeout,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
