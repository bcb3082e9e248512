//! Persistent benchmark record for one experiment and model.
//!
//! Records live in a benchmark directory as
//! `benchmark_results_{experiment}_{model}.json`. Retrieval and resolution
//! scores are written by separate runs, so each run loads the existing record
//! (or creates a fresh one), fills in its own section and saves it back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::summary::{MetricSummary, NamedSummary};
use crate::error::{Result, VisogenderError};
use crate::resolution::{overall_accuracy, AccuracyGap, TwoPersonAccuracy};

/// Scalar metrics a fresh CLIP-like record reserves in its retrieval section.
pub const DEFAULT_RECORD_METRICS: [&str; 5] =
    ["bias@5", "bias@10", "maxskew@5", "maxskew@10", "NDKL"];

/// Which experiment produced the record and for which model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkMetadata {
    pub experiment_desc: String,
    pub model_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AllImages {
    pub overall_accuracy: Option<f64>,
}

/// Resolution bias section of the record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolutionBenchmark {
    pub all_images: AllImages,
    pub single_person_images: AccuracyGap,
    pub two_person_images: AccuracyGap,
    pub two_person_images_same_gender: AccuracyGap,
    pub two_person_images_diff_gender: AccuracyGap,
}

/// Benchmark scores for one experiment/model pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub metadata: BenchmarkMetadata,

    pub resolution_bias: ResolutionBenchmark,

    /// Mean and sigma per retrieval metric; absent for captioning experiments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval_bias: Option<BTreeMap<String, MetricSummary>>,
}

/// Retrieval bias only applies to models that score image/text similarity.
pub fn is_clip_like(experiment: &str) -> bool {
    experiment.eq_ignore_ascii_case("clip")
}

impl BenchmarkRecord {
    /// Fresh record with empty scores.
    ///
    /// CLIP-like experiments get a retrieval section holding an empty
    /// summary for each of `retrieval_metrics`.
    pub fn new<S: AsRef<str>>(experiment: &str, model: &str, retrieval_metrics: &[S]) -> Self {
        let retrieval_bias = is_clip_like(experiment).then(|| {
            retrieval_metrics
                .iter()
                .map(|m| (m.as_ref().to_string(), MetricSummary::default()))
                .collect()
        });
        Self {
            metadata: BenchmarkMetadata {
                experiment_desc: experiment.to_string(),
                model_name: model.to_string(),
            },
            resolution_bias: ResolutionBenchmark::default(),
            retrieval_bias,
        }
    }

    /// File name of the record for an experiment/model pair.
    pub fn file_name(experiment: &str, model: &str) -> String {
        format!("benchmark_results_{experiment}_{model}.json")
    }

    /// Full path of the record inside `dir`.
    pub fn path_in(dir: &Path, experiment: &str, model: &str) -> PathBuf {
        dir.join(Self::file_name(experiment, model))
    }

    /// Read a record from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| VisogenderError::Benchmark {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the record for this pair from `dir`, or create and write a fresh one.
    pub fn load_or_create<S: AsRef<str>>(
        dir: &Path,
        experiment: &str,
        model: &str,
        retrieval_metrics: &[S],
    ) -> Result<Self> {
        let path = Self::path_in(dir, experiment, model);
        if path.exists() {
            let record = Self::load(&path)?;
            tracing::info!(
                "Benchmark exists for experiment {experiment} and model {model}; loaded {:?}",
                path
            );
            Ok(record)
        } else {
            let record = Self::new(experiment, model, retrieval_metrics);
            record.save(dir)?;
            tracing::info!(
                "Benchmark did not exist for experiment {experiment} and model {model}; created {:?}",
                path
            );
            Ok(record)
        }
    }

    /// Write the record as pretty JSON into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = Self::path_in(dir, &self.metadata.experiment_desc, &self.metadata.model_name);
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        std::fs::write(&path, content)?;
        tracing::debug!("Saved benchmark record to {:?}", path);
        Ok(path)
    }

    /// Store retrieval summaries, creating the retrieval section if absent.
    pub fn update_retrieval(&mut self, summaries: &[NamedSummary]) {
        let section = self.retrieval_bias.get_or_insert_with(BTreeMap::new);
        for named in summaries {
            section.insert(named.metric.clone(), named.summary);
        }
    }

    /// Store resolution accuracies and derive the overall accuracy.
    pub fn update_resolution(
        &mut self,
        single_person: AccuracyGap,
        two_person: TwoPersonAccuracy,
        decimals: u32,
    ) {
        let overall = overall_accuracy(&two_person.overall, &single_person, decimals);

        self.resolution_bias = ResolutionBenchmark {
            all_images: AllImages {
                overall_accuracy: overall,
            },
            single_person_images: single_person,
            two_person_images: two_person.overall,
            two_person_images_same_gender: two_person.same_gender,
            two_person_images_diff_gender: two_person.diff_gender,
        };
    }
}
