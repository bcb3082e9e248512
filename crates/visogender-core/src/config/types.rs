//! Sub-configuration structs with defaults matching the published benchmark.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::benchmark::DEFAULT_RECORD_METRICS;
use crate::retrieval::{PositionalPattern, RetrievalOptions};

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where benchmark records are written
    pub benchmark_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            benchmark_dir: PathBuf::from("~/.visogender/results/benchmark_scores"),
        }
    }
}

/// Retrieval bias settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Relabel candidates positionally as same/diff by default
    pub diff_gender: bool,

    /// Positional candidate layout
    pub pattern: PositionalPattern,
}

impl RetrievalConfig {
    /// Calculator options; `diff_gender` overrides the configured grouping when set.
    pub fn options(&self, diff_gender: Option<bool>) -> RetrievalOptions {
        RetrievalOptions::new(diff_gender.unwrap_or(self.diff_gender)).with_pattern(self.pattern)
    }
}

/// Benchmark summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Metrics stored in a benchmark record's retrieval section
    pub record_metrics: Vec<String>,

    /// Metrics reported by `retrieval summary`
    pub summary_metrics: Vec<String>,

    /// Decimal places for every reported score
    pub decimals: u32,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            record_metrics: DEFAULT_RECORD_METRICS.iter().map(|m| m.to_string()).collect(),
            summary_metrics: vec![
                "bias@5".to_string(),
                "bias@10".to_string(),
                "maxskew@5".to_string(),
                "maxskew@10".to_string(),
                "ndkl".to_string(),
                "bias_count@10".to_string(),
            ],
            decimals: 2,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
