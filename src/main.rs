//! dirsynth CLI: generate a dataset from a settings file
//!
//! Thin glue around the synthesis engine: load a configuration, run one
//! generation mode, write the JSON Lines dataset, log the statistics.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dirsynth::{Config, Synthesizer};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirsynth", version, about = "Identity attack-graph synthesizer")]
struct Cli {
    /// Settings JSON file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Domain name for the generated environment
    #[arg(long, default_value = dirsynth::synth::DEFAULT_DOMAIN)]
    domain: String,

    /// Domain name of a previous run, for naming continuity
    #[arg(long)]
    previous_domain: Option<String>,

    /// What to generate
    #[arg(long, value_enum, default_value = "on-prem")]
    mode: Mode,

    /// Output JSON Lines file
    #[arg(short, long, default_value = "dataset.json")]
    output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    OnPrem,
    Cloud,
    Hybrid,
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading settings file {}", path.display()))?,
        None => {
            tracing::warn!("no settings file given, using defaults");
            Config::default()
        }
    };

    let mut synth = Synthesizer::new(cfg, cli.domain, cli.previous_domain);
    match cli.mode {
        Mode::OnPrem => {
            synth.run_on_prem();
        }
        Mode::Cloud => {
            synth.run_cloud();
        }
        Mode::Hybrid => {
            let sync = synth.run_hybrid();
            tracing::info!(synced = sync.len(), "hybrid sync mapping complete");
        }
    }

    dirsynth::export::write_to_path(synth.store(), &cli.output)
        .with_context(|| format!("writing dataset to {}", cli.output.display()))?;

    let stats = synth.store().statistics();
    tracing::info!(
        output = %cli.output.display(),
        nodes = stats.node_count,
        edges = stats.edge_count,
        "dataset written"
    );
    Ok(())
}
