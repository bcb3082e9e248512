//! Command handlers and the file plumbing they share.

pub mod benchmark;
pub mod config;
pub mod resolution;
pub mod retrieval;

use anyhow::Context as _;
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;
use visogender_core::output::OutputFormat as CoreOutputFormat;
use visogender_core::{Config, OutputWriter};

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Output format from the command line, falling back to the config default.
pub fn resolve_format(arg: Option<OutputFormat>, config: &Config) -> CoreOutputFormat {
    match arg {
        Some(OutputFormat::Json) => CoreOutputFormat::Json,
        Some(OutputFormat::Jsonl) => CoreOutputFormat::JsonLines,
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Json),
    }
}

/// Read and deserialize a JSON input file.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Render output through an [`OutputWriter`], then send it to `output` or stdout.
pub async fn emit<F>(
    output: Option<&Path>,
    format: CoreOutputFormat,
    pretty: bool,
    render: F,
) -> anyhow::Result<()>
where
    F: FnOnce(&mut OutputWriter<&mut Vec<u8>>) -> std::io::Result<()>,
{
    let mut buffer = Vec::new();
    let items = {
        let mut writer = OutputWriter::new(&mut buffer, format, pretty);
        render(&mut writer)?;
        writer.items_written()
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, &buffer)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {items} item(s) to {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&buffer)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
