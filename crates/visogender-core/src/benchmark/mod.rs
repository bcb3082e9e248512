//! Benchmark scores: metric summaries and the persistent per-model record.

pub mod record;
pub mod summary;

pub use record::{
    is_clip_like, AllImages, BenchmarkMetadata, BenchmarkRecord, ResolutionBenchmark,
    DEFAULT_RECORD_METRICS,
};
pub use summary::{collect_metric, summarize, summarize_metrics, MetricSummary, NamedSummary};
