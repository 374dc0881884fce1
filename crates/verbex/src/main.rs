use std::io::{self, BufWriter};

use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use verbex::Config;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::parse();
    info!("using corpus at {}", config.corpus_dir.display());

    let stdout = io::stdout();
    let summary = verbex::run(&config, BufWriter::new(stdout.lock()))?;
    info!(
        "reported {} adjacent pairs from {} documents",
        summary.pairs, summary.documents
    );
    Ok(())
}

/// Log to stderr so the report on stdout stays clean; `RUST_LOG` overrides
/// the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
