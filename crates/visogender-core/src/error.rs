//! Error types for VisoGender bias analysis.
//!
//! Errors are organized by concern so that messages carry the context needed
//! to fix the input (occupation names, sample ids, metric names, file paths).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for VisoGender operations.
#[derive(Error, Debug)]
pub enum VisogenderError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Metric computation errors
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Benchmark record errors
    #[error("Benchmark error for {path}: {message}")]
    Benchmark { path: PathBuf, message: String },

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while computing retrieval or resolution metrics.
#[derive(Error, Debug, PartialEq)]
pub enum AnalysisError {
    /// Logits and gender labels are not aligned
    #[error("{occupation}: {logits} logits but {genders} gender labels")]
    LengthMismatch {
        occupation: String,
        logits: usize,
        genders: usize,
    },

    /// A non-error occupation without any candidate images
    #[error("{occupation}: no candidate images to rank")]
    EmptyCandidates { occupation: String },

    /// More candidates than the positional pattern covers
    #[error("{occupation}: {candidates} candidates exceed the {pattern_len}-slot positional pattern")]
    PatternTooShort {
        occupation: String,
        candidates: usize,
        pattern_len: usize,
    },

    /// Metric name could not be parsed
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// A rank cutoff beyond the occupation's candidate list
    #[error("{occupation}: metric {metric} needs k <= {candidates}")]
    MetricOutOfRange {
        occupation: String,
        metric: String,
        candidates: usize,
    },

    /// A resolution sample lacks the logits for a template order
    #[error("Sample {sample}: missing {field}")]
    MissingField { sample: String, field: &'static str },
}

/// Convenience type alias for VisoGender results.
pub type Result<T> = std::result::Result<T, VisogenderError>;

/// Convenience type alias for analysis-specific results.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
