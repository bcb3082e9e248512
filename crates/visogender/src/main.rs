//! VisoGender CLI - gender bias scoring for vision-language model outputs.
//!
//! The model runs (CLIP-like retrieval, captioning likelihoods) happen
//! elsewhere and write JSON. This tool turns those outputs into bias metrics
//! and keeps a per-model benchmark record up to date.
//!
//! # Usage
//!
//! ```bash
//! # Per-occupation retrieval metrics
//! visogender retrieval analyze results.json -o analysis.json
//!
//! # Mean and sigma of selected metrics
//! visogender retrieval summary analysis.json --metric bias@5 --metric ndkl
//!
//! # Per-sample pronoun predictions
//! visogender resolution analyze --op op.json --oo oo.json -o outcomes.json
//!
//! # Update the benchmark record
//! visogender benchmark retrieval results.json --model clip
//! visogender benchmark resolution --op op.json --oo oo.json --model blipv2 --experiment CAPTIONING
//!
//! # View configuration
//! visogender config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// VisoGender - retrieval and resolution bias scoring for vision-language models.
#[derive(Parser, Debug)]
#[command(name = "visogender")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "VISOGENDER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute and summarize retrieval bias metrics
    Retrieval(cli::retrieval::RetrievalArgs),

    /// Evaluate pronoun resolution per sample
    Resolution(cli::resolution::ResolutionArgs),

    /// Write retrieval or resolution scores into a benchmark record
    Benchmark(cli::benchmark::BenchmarkArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    // An explicit --config must load; the default location falls back.
    let config = match &cli.config {
        Some(path) => visogender_core::Config::load_from(path)?,
        None => match visogender_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `visogender config path`."
                );
                visogender_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("VisoGender v{}", visogender_core::VERSION);

    match cli.command {
        Commands::Retrieval(args) => cli::retrieval::execute(args, &config).await,
        Commands::Resolution(args) => cli::resolution::execute(args, &config).await,
        Commands::Benchmark(args) => cli::benchmark::execute(args, &config).await,
        Commands::Config(args) => {
            cli::config::execute(args, &config, cli.config.as_deref()).await
        }
    }
}
