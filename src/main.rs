use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use prose_signal::{Analyzer, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "prose-signal",
    about = "Estimate how likely prose is to be machine-written",
    version
)]
struct Cli {
    /// JSON config overriding caps and detector settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File paths to analyze (reads stdin if none provided)
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    let analyzer = Analyzer::new(&config)?;
    info!(detectors = analyzer.registry().len(), "analyzer ready");

    if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        let result = analyzer.analyze(&input);
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for path in &cli.files {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let result = analyzer.analyze(&text);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}
