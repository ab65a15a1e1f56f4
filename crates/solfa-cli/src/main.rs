//! CLI for the Solfa conversion pipeline: a thin shim that wires the
//! Audiveris adapter into the pipeline and reports the outcome.

use anyhow::Result;
use clap::Parser;
use solfa_core::ConversionPipeline;
use solfa_infra_omr_audiveris::AudiverisEngine;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Convert a scanned score PDF to MusicXML with Audiveris.
#[derive(Parser)]
#[command(name = "solfa", version)]
struct Cli {
    /// Input PDF score.
    input: PathBuf,

    /// Directory the MusicXML output is written to.
    #[arg(short, long)]
    output: PathBuf,

    /// Audiveris executable, or a macOS .app bundle path.
    #[arg(long, env = "SOLFA_AUDIVERIS")]
    audiveris: Option<String>,

    /// Print the stage report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let engine = Box::new(AudiverisEngine::new(cli.audiveris));
    let pipeline = ConversionPipeline::new(engine, cli.input, cli.output);
    let report = pipeline.run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if !report.succeeded {
        std::process::exit(1);
    }
    Ok(())
}
