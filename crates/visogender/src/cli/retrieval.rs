//! The `visogender retrieval` command: per-occupation metrics and their summary.

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use visogender_core::benchmark::summarize_metrics;
use visogender_core::{
    calculate_retrieval_bias, Config, RetrievalBias, RetrievalOptions, RetrievalResults,
};

use super::{emit, read_json, resolve_format, OutputFormat};

/// Arguments for the `retrieval` command.
#[derive(Args, Debug)]
pub struct RetrievalArgs {
    #[command(subcommand)]
    pub command: RetrievalCommand,
}

/// Subcommands for retrieval bias analysis.
#[derive(Subcommand, Debug)]
pub enum RetrievalCommand {
    /// Compute skew, bias and NDKL for every occupation in a results file
    Analyze {
        /// JSON results keyed by occupation
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Group candidates as same/diff-gender pairs by position
        #[arg(long, overrides_with = "no_diff_gender")]
        diff_gender: bool,

        /// Group candidates by annotated gender even if the config says otherwise
        #[arg(long, overrides_with = "diff_gender")]
        no_diff_gender: bool,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Mean and sample standard deviation of metrics from an analysis file
    Summary {
        /// JSON output of `retrieval analyze`
        input: PathBuf,

        /// Metric to summarize, repeatable (e.g. bias@5, maxskew@10, ndkl)
        #[arg(short, long = "metric")]
        metrics: Vec<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Execute the retrieval command.
pub async fn execute(args: RetrievalArgs, config: &Config) -> anyhow::Result<()> {
    match args.command {
        RetrievalCommand::Analyze {
            input,
            output,
            diff_gender,
            no_diff_gender,
            format,
        } => {
            let grouping = grouping_override(diff_gender, no_diff_gender);
            let bias = analyze(&input, &config.retrieval.options(grouping)).await?;
            emit(
                output.as_deref(),
                resolve_format(format, config),
                config.output.pretty,
                |w| w.write_map(&bias, "occupation"),
            )
            .await
        }

        RetrievalCommand::Summary {
            input,
            metrics,
            output,
            format,
        } => {
            let bias: RetrievalBias = read_json(&input).await?;
            let metrics = if metrics.is_empty() {
                config.benchmark.summary_metrics.clone()
            } else {
                metrics
            };
            let table = summarize_metrics(&bias, &metrics, config.benchmark.decimals)?;
            emit(
                output.as_deref(),
                resolve_format(format, config),
                config.output.pretty,
                |w| w.write_all(&table),
            )
            .await
        }
    }
}

/// `Some` when either grouping flag was given; the last one wins.
fn grouping_override(diff_gender: bool, no_diff_gender: bool) -> Option<bool> {
    match (diff_gender, no_diff_gender) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Load a results file and compute its retrieval metrics.
pub async fn analyze(input: &Path, options: &RetrievalOptions) -> anyhow::Result<RetrievalBias> {
    let results: RetrievalResults = read_json(input).await?;
    tracing::debug!("Loaded {} occupation(s) from {:?}", results.len(), input);
    Ok(calculate_retrieval_bias(&results, options)?)
}
