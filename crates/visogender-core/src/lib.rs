//! VisoGender Core - gender bias metrics for vision-language models.
//!
//! The VisoGender benchmark measures two kinds of bias from model outputs that
//! were produced elsewhere (CLIP-like similarity scores, captioning
//! likelihoods):
//!
//! - **Retrieval bias**: given a gender-neutral occupation query, are the
//!   top-ranked images skewed toward one gender?
//! - **Resolution bias**: given an image, does the model pick the pronoun
//!   matching the annotated gender of the person it refers to?
//!
//! # Architecture
//!
//! Every stage is a pure function over deserialized JSON:
//!
//! ```text
//! retrieval results → calculate_retrieval_bias → summarize_metrics ─┐
//!                                                                    ├→ BenchmarkRecord
//! resolution samples → analyze_samples → *_person_accuracy ──────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use visogender_core::{calculate_retrieval_bias, summarize_metrics, RetrievalOptions};
//!
//! let results = serde_json::from_str(&std::fs::read_to_string("results.json")?)?;
//! let bias = calculate_retrieval_bias(&results, &RetrievalOptions::default())?;
//! for row in summarize_metrics(&bias, &["bias@5", "ndkl"], 2)? {
//!     println!("{}: {:?}", row.metric, row.summary.mean);
//! }
//! ```

// Module declarations
pub mod benchmark;
pub mod config;
pub mod error;
pub mod math;
pub mod output;
pub mod resolution;
pub mod retrieval;
pub mod types;

// Re-exports for convenient access
pub use benchmark::{summarize_metrics, BenchmarkRecord, MetricSummary, NamedSummary};
pub use config::Config;
pub use error::{AnalysisError, AnalysisResult, ConfigError, Result, VisogenderError};
pub use output::{OutputFormat, OutputWriter};
pub use resolution::{analyze_samples, Context, ResolutionOutcome};
pub use retrieval::{
    calculate_retrieval_bias, Metric, PositionalPattern, RetrievalBias, RetrievalMetrics,
    RetrievalOptions,
};
pub use types::{
    Gender, GenderLabel, OccupationResult, PronounLogits, ResolutionSample, ResolutionSamples,
    RetrievalResults,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
