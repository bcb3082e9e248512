//! The `visogender benchmark` command: fill in a model's benchmark record.

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use visogender_core::benchmark::{is_clip_like, summarize_metrics};
use visogender_core::resolution::{
    analyze_samples, single_person_accuracy, two_person_accuracy, Context,
};
use visogender_core::{BenchmarkRecord, Config, ResolutionSamples, RetrievalOptions};

use super::read_json;
use super::retrieval::analyze;

/// Arguments for the `benchmark` command.
#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    /// Directory holding benchmark records (defaults to the configured one)
    #[arg(long, global = true)]
    pub benchmark_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: BenchmarkCommand,
}

/// Subcommands for benchmark scoring.
#[derive(Subcommand, Debug)]
pub enum BenchmarkCommand {
    /// Record retrieval bias summaries for a CLIP-like model
    Retrieval {
        /// JSON retrieval results keyed by occupation
        input: PathBuf,

        /// Model name used in the record
        #[arg(short, long)]
        model: String,

        /// Experiment description
        #[arg(short, long, default_value = "CLIP")]
        experiment: String,
    },

    /// Record resolution accuracy and gender gap
    Resolution {
        /// JSON outputs for two-person (occupation/participant) images
        #[arg(long)]
        op: PathBuf,

        /// JSON outputs for single-person (occupation/object) images
        #[arg(long)]
        oo: PathBuf,

        /// Model name used in the record
        #[arg(short, long)]
        model: String,

        /// Experiment description ("CLIP" or "CAPTIONING")
        #[arg(short, long)]
        experiment: String,
    },
}

/// Execute the benchmark command.
pub async fn execute(args: BenchmarkArgs, config: &Config) -> anyhow::Result<()> {
    let dir = args.benchmark_dir.unwrap_or_else(|| config.benchmark_dir());

    let path = match args.command {
        BenchmarkCommand::Retrieval {
            input,
            model,
            experiment,
        } => record_retrieval(&dir, &input, &model, &experiment, config).await?,
        BenchmarkCommand::Resolution {
            op,
            oo,
            model,
            experiment,
        } => record_resolution(&dir, &op, &oo, &model, &experiment, config).await?,
    };

    println!("Saved under {}", path.display());
    Ok(())
}

async fn record_retrieval(
    dir: &Path,
    input: &Path,
    model: &str,
    experiment: &str,
    config: &Config,
) -> anyhow::Result<PathBuf> {
    if !is_clip_like(experiment) {
        tracing::warn!(
            "Retrieval bias is defined for CLIP-like models; recording it for experiment {experiment}"
        );
    }

    // benchmark scores are always reported over annotated genders
    let options = RetrievalOptions::new(false).with_pattern(config.retrieval.pattern);
    let bias = analyze(input, &options).await?;
    let summaries = summarize_metrics(
        &bias,
        &config.benchmark.record_metrics,
        config.benchmark.decimals,
    )?;

    let mut record =
        BenchmarkRecord::load_or_create(dir, experiment, model, &config.benchmark.record_metrics)?;
    record.update_retrieval(&summaries);
    Ok(record.save(dir)?)
}

async fn record_resolution(
    dir: &Path,
    op: &Path,
    oo: &Path,
    model: &str,
    experiment: &str,
    config: &Config,
) -> anyhow::Result<PathBuf> {
    let op_samples: ResolutionSamples = read_json(op).await?;
    let oo_samples: ResolutionSamples = read_json(oo).await?;

    let op_outcomes = analyze_samples(&op_samples, Context::OccupationParticipant)?;
    let oo_outcomes = analyze_samples(&oo_samples, Context::OccupationObject)?;

    let decimals = config.benchmark.decimals;
    let single = single_person_accuracy(oo_outcomes.values(), decimals);
    let two = two_person_accuracy(op_outcomes.values(), decimals);

    let mut record =
        BenchmarkRecord::load_or_create(dir, experiment, model, &config.benchmark.record_metrics)?;
    record.update_resolution(single, two, decimals);
    tracing::info!(
        "Overall resolution accuracy for {model}: {:?}",
        record.resolution_bias.all_images.overall_accuracy
    );
    Ok(record.save(dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn op_sample(occ: &str, par: &str, his: f64, her: f64) -> String {
        format!(
            r#"{{"occ": "doctor", "occ_gender": "{occ}", "par": "patient", "par_gender": "{par}",
                "logits_list_occ_first": {{"his": {his}, "her": {her}, "their": 0.0}},
                "logits_list_par_first": {{"his": 0.1, "her": 0.1, "their": 0.8}}}}"#
        )
    }

    fn oo_sample(occ: &str, his: f64, her: f64) -> String {
        format!(
            r#"{{"occ": "doctor", "occ_gender": "{occ}", "obj": "stethoscope",
                "logits_list_obj": {{"his": {his}, "her": {her}, "their": 0.0}}}}"#
        )
    }

    #[tokio::test]
    async fn test_resolution_record() {
        let dir = tempdir().unwrap();
        let op = dir.path().join("op.json");
        let oo = dir.path().join("oo.json");
        std::fs::write(
            &op,
            format!(
                "{{\"a\": {}, \"b\": {}, \"c\": {}, \"d\": {}}}",
                op_sample("masculine", "masculine", 0.9, 0.1),
                op_sample("masculine", "feminine", 0.1, 0.9),
                op_sample("feminine", "feminine", 0.1, 0.9),
                op_sample("feminine", "masculine", 0.1, 0.9),
            ),
        )
        .unwrap();
        std::fs::write(
            &oo,
            format!(
                "{{\"a\": {}, \"b\": {}}}",
                oo_sample("masculine", 0.9, 0.1),
                oo_sample("feminine", 0.9, 0.1),
            ),
        )
        .unwrap();

        let config = Config::default();
        let path = record_resolution(dir.path(), &op, &oo, "blipv2", "CAPTIONING", &config)
            .await
            .unwrap();
        assert!(path.ends_with("benchmark_results_CAPTIONING_blipv2.json"));

        let record = BenchmarkRecord::load(&path).unwrap();
        assert!(record.retrieval_bias.is_none());
        let resolution = record.resolution_bias;
        // two-person: his 0.5, her 1.0; single-person: his 1.0, her 0.0
        assert_eq!(resolution.two_person_images.ra_avg, Some(0.75));
        assert_eq!(resolution.two_person_images.gender_gap, Some(-0.5));
        assert_eq!(resolution.single_person_images.ra_avg, Some(0.5));
        assert_eq!(resolution.single_person_images.gender_gap, Some(1.0));
        assert_eq!(resolution.all_images.overall_accuracy, Some(0.62));
        assert_eq!(resolution.two_person_images_same_gender.ra_avg, Some(1.0));
        assert_eq!(resolution.two_person_images_diff_gender.ra_avg, Some(0.5));
    }

    fn write_retrieval_results(path: &Path) {
        let mut results = serde_json::Map::new();
        for (i, name) in ["teacher", "nurse"].iter().enumerate() {
            let logits: Vec<f64> = (0..10).map(|j| ((i + 1) * (j + 3) % 7) as f64).collect();
            let genders: Vec<&str> = (0..10)
                .map(|j| if j % 2 == 0 { "masculine" } else { "feminine" })
                .collect();
            results.insert(
                name.to_string(),
                serde_json::json!({"logits_list": logits, "occ_genders": genders}),
            );
        }
        std::fs::write(path, serde_json::Value::Object(results).to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_retrieval_record_keeps_resolution_scores() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("results.json");
        write_retrieval_results(&input);

        let mut existing = BenchmarkRecord::new("CLIP", "clip", &["bias@5"]);
        existing.resolution_bias.all_images.overall_accuracy = Some(0.7);
        existing.save(dir.path()).unwrap();

        let config = Config::default();
        let path = record_retrieval(dir.path(), &input, "clip", "CLIP", &config)
            .await
            .unwrap();

        let record = BenchmarkRecord::load(&path).unwrap();
        assert_eq!(record.resolution_bias.all_images.overall_accuracy, Some(0.7));
        let retrieval = record.retrieval_bias.unwrap();
        assert_eq!(retrieval.len(), 5);
        assert!(retrieval["NDKL"].mean.unwrap() >= 0.0);
        assert!(retrieval["bias@10"].sigma.is_some());
    }

    #[tokio::test]
    async fn test_retrieval_record_ignores_configured_diff_gender() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("results.json");
        write_retrieval_results(&input);
        let standard_dir = dir.path().join("standard");
        let diff_dir = dir.path().join("diff");

        let standard = record_retrieval(&standard_dir, &input, "clip", "CLIP", &Config::default())
            .await
            .unwrap();

        let mut config = Config::default();
        config.retrieval.diff_gender = true;
        let diff = record_retrieval(&diff_dir, &input, "clip", "CLIP", &config)
            .await
            .unwrap();

        let standard = BenchmarkRecord::load(&standard).unwrap().retrieval_bias.unwrap();
        let diff = BenchmarkRecord::load(&diff).unwrap().retrieval_bias.unwrap();
        assert!(standard["bias@5"].mean.is_some());
        assert_eq!(standard, diff);
    }
}
