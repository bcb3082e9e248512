//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;
use crate::retrieval::Metric;

use super::Config;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.pattern.is_empty() {
            return Err(ConfigError::ValidationError(
                "retrieval.pattern must cover at least one candidate".into(),
            ));
        }
        for (section, metrics) in [
            ("benchmark.record_metrics", &self.benchmark.record_metrics),
            ("benchmark.summary_metrics", &self.benchmark.summary_metrics),
        ] {
            for name in metrics {
                name.parse::<Metric>().map_err(|e| {
                    ConfigError::ValidationError(format!("{section}: {e}"))
                })?;
            }
        }
        if self.benchmark.decimals > 10 {
            return Err(ConfigError::ValidationError(
                "benchmark.decimals must be <= 10".into(),
            ));
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got \"{}\"",
                self.output.format
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got \"{}\"",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}
