//! bindle CLI - bundle an ES module tree into a single script.
//!
//! Usage:
//! - `bindle app.js` - bundle to stdout
//! - `bindle app.js -o bundle.js` - bundle to a file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bindle",
    version,
    about = "Bundle an ES module and its dependencies into a single script"
)]
struct Cli {
    /// Entry point module
    entry: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let script = bindle_core::bundle(&cli.entry)
        .with_context(|| format!("failed to bundle {}", cli.entry.display()))?;
    let code = bindle_core::script_to_string(&script).context("failed to print bundle")?;

    match &cli.output {
        Some(output) => {
            std::fs::write(output, &code)
                .with_context(|| format!("failed to write {}", output.display()))?;
            eprintln!(
                "  Bundled: {} ({:.2} KB)",
                output.display(),
                code.len() as f64 / 1024.0
            );
        }
        None => print!("{code}"),
    }

    Ok(())
}
