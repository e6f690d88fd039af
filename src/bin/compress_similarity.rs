//! Rewrites a similarity matrix snapshot gzip-compressed.
//!
//! The matrix is fully loaded and validated (square, numeric) before
//! anything is written.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cinematch_api::{db::snapshot, services::SimilarityIndex};

#[derive(Debug, Parser)]
#[command(name = "compress-similarity", about = "Compress a similarity matrix snapshot")]
struct Args {
    /// Similarity snapshot to read (plain or gzip JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Destination for the gzip-compressed snapshot
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let index = SimilarityIndex::load(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    tracing::info!(
        input = %args.input.display(),
        rows = index.dimension(),
        columns = index.dimension(),
        "Similarity matrix loaded"
    );

    snapshot::write_snapshot(&args.output, true, |writer| index.write_snapshot(writer))
        .with_context(|| format!("writing {}", args.output.display()))?;

    let input_bytes = std::fs::metadata(&args.input).map(|m| m.len()).unwrap_or(0);
    let output_bytes = std::fs::metadata(&args.output).map(|m| m.len()).unwrap_or(0);
    tracing::info!(
        output = %args.output.display(),
        input_bytes,
        output_bytes,
        "Compressed similarity matrix written"
    );

    Ok(())
}
