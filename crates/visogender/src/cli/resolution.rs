//! The `visogender resolution` command: per-sample pronoun predictions.

use anyhow::bail;
use clap::{Args, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use visogender_core::resolution::{analyze_samples, Context, ResolutionOutcome};
use visogender_core::{Config, ResolutionSamples};

use super::{emit, read_json, resolve_format, OutputFormat};

/// Arguments for the `resolution` command.
#[derive(Args, Debug)]
pub struct ResolutionArgs {
    #[command(subcommand)]
    pub command: ResolutionCommand,
}

/// Subcommands for resolution bias analysis.
#[derive(Subcommand, Debug)]
pub enum ResolutionCommand {
    /// Predicted pronoun and truth/neutral checks for every sample
    Analyze {
        /// Occupation-participant samples (two-person images)
        #[arg(long)]
        op: Option<PathBuf>,

        /// Occupation-object samples (single-person images)
        #[arg(long)]
        oo: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Execute the resolution command.
pub async fn execute(args: ResolutionArgs, config: &Config) -> anyhow::Result<()> {
    match args.command {
        ResolutionCommand::Analyze {
            op,
            oo,
            output,
            format,
        } => {
            let outcomes = analyze(op.as_deref(), oo.as_deref()).await?;
            emit(
                output.as_deref(),
                resolve_format(format, config),
                config.output.pretty,
                |w| w.write_map(&outcomes, "sample"),
            )
            .await
        }
    }
}

/// Evaluate the given sample files into one map keyed by sample id.
pub async fn analyze(
    op: Option<&Path>,
    oo: Option<&Path>,
) -> anyhow::Result<BTreeMap<String, ResolutionOutcome>> {
    if op.is_none() && oo.is_none() {
        bail!("Nothing to analyze: pass --op, --oo or both");
    }

    let mut outcomes = BTreeMap::new();
    let inputs = [
        (op, Context::OccupationParticipant),
        (oo, Context::OccupationObject),
    ];
    for (path, context) in inputs {
        let Some(path) = path else { continue };
        let samples: ResolutionSamples = read_json(path).await?;
        tracing::debug!("Loaded {} sample(s) from {:?}", samples.len(), path);

        for (id, outcome) in analyze_samples(&samples, context)? {
            if outcomes.contains_key(&id) {
                bail!("Sample {id} appears in both the OP and OO inputs");
            }
            outcomes.insert(id, outcome);
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const OP: &str = r#"{
        "OP_1": {
            "occ": "doctor", "occ_gender": "feminine",
            "par": "patient", "par_gender": "masculine",
            "logits_list_occ_first": {"his": 0.2, "her": 0.7, "their": 0.1},
            "logits_list_par_first": {"his": 0.1, "her": 0.2, "their": 0.7}
        }
    }"#;

    const OO: &str = r#"{
        "OO_1": {
            "occ": "doctor", "occ_gender": "masculine", "obj": "stethoscope",
            "logits_list_obj": {"his": 0.3, "her": 0.6, "their": 0.1}
        }
    }"#;

    #[tokio::test]
    async fn test_analyze_writes_outcome_map() {
        let dir = tempdir().unwrap();
        let op = dir.path().join("op.json");
        let oo = dir.path().join("oo.json");
        let out = dir.path().join("outcomes.json");
        std::fs::write(&op, OP).unwrap();
        std::fs::write(&oo, OO).unwrap();

        let args = ResolutionArgs {
            command: ResolutionCommand::Analyze {
                op: Some(op),
                oo: Some(oo),
                output: Some(out.clone()),
                format: Some(OutputFormat::Json),
            },
        };
        execute(args, &Config::default()).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["OP_1"]["context"], "context_OP");
        assert_eq!(written["OP_1"]["occ_first"]["match_truth"], true);
        assert_eq!(written["OP_1"]["par_first"]["neutral_check"], true);
        assert_eq!(written["OP_1"]["par_first"]["match_truth"], false);
        assert_eq!(written["OO_1"]["context"], "context_OO");
        assert_eq!(written["OO_1"]["occ_first"]["match_truth"], false);
        assert!(written["OO_1"].get("par_first").is_none());
    }

    #[tokio::test]
    async fn test_analyze_jsonl_folds_sample_id() {
        let dir = tempdir().unwrap();
        let oo = dir.path().join("oo.json");
        let out = dir.path().join("outcomes.jsonl");
        std::fs::write(&oo, OO).unwrap();

        let args = ResolutionArgs {
            command: ResolutionCommand::Analyze {
                op: None,
                oo: Some(oo),
                output: Some(out.clone()),
                format: Some(OutputFormat::Jsonl),
            },
        };
        execute(args, &Config::default()).await.unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let line: serde_json::Value =
            serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(line["sample"], "OO_1");
        assert_eq!(line["occ_first"]["neutral_check"], false);
    }

    #[tokio::test]
    async fn test_analyze_requires_an_input() {
        let err = analyze(None, None).await.unwrap_err();
        assert!(err.to_string().contains("--op"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_shared_sample_id() {
        let dir = tempdir().unwrap();
        let op = dir.path().join("op.json");
        let oo = dir.path().join("oo.json");
        std::fs::write(&op, OP).unwrap();
        std::fs::write(&oo, OO.replace("OO_1", "OP_1")).unwrap();

        let err = analyze(Some(&op), Some(&oo)).await.unwrap_err();
        assert!(err.to_string().contains("OP_1"));
    }
}
