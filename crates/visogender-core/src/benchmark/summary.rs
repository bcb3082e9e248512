//! Mean and spread of scalar retrieval metrics across occupations.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::math::{mean, round_to, sample_std};
use crate::retrieval::{Metric, RetrievalBias};

/// Mean and sample standard deviation of one metric.
///
/// Both values are rounded. `sigma` uses one delta degree of freedom and is
/// `None` with fewer than two values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: Option<f64>,
    pub sigma: Option<f64>,
}

/// A summary labeled with the metric name it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSummary {
    pub metric: String,

    #[serde(flatten)]
    pub summary: MetricSummary,
}

/// Summarize `values`, rounding both statistics to `decimals` places.
pub fn summarize(values: &[f64], decimals: u32) -> MetricSummary {
    MetricSummary {
        mean: mean(values).map(|m| round_to(m, decimals)),
        sigma: sample_std(values).map(|s| round_to(s, decimals)),
    }
}

/// Gather one scalar metric from every occupation, in occupation order.
pub fn collect_metric(bias: &RetrievalBias, metric: Metric) -> AnalysisResult<Vec<f64>> {
    bias.iter()
        .map(|(occupation, metrics)| {
            metrics
                .scalar(metric)
                .ok_or_else(|| AnalysisError::MetricOutOfRange {
                    occupation: occupation.clone(),
                    metric: metric.to_string(),
                    candidates: metrics.candidate_count(),
                })
        })
        .collect()
}

/// Summarize each named metric across all occupations, keeping the given order.
///
/// Names are parsed case-insensitively but reported as given, so a record
/// keyed by `NDKL` keeps that key.
pub fn summarize_metrics<S: AsRef<str>>(
    bias: &RetrievalBias,
    metrics: &[S],
    decimals: u32,
) -> AnalysisResult<Vec<NamedSummary>> {
    metrics
        .iter()
        .map(|name| -> AnalysisResult<NamedSummary> {
            let name = name.as_ref();
            let metric: Metric = name.parse()?;
            let values = collect_metric(bias, metric)?;
            tracing::debug!("{name}: {} value(s)", values.len());
            Ok(NamedSummary {
                metric: name.to_string(),
                summary: summarize(&values, decimals),
            })
        })
        .collect()
}
