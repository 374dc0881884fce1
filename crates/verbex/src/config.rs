use std::path::PathBuf;

use clap::Parser;

/// Runtime configuration: where the corpus lives.
#[derive(Parser, Debug, Clone)]
#[command(name = "verbex", version)]
#[command(about = "Report adjacent verb pairs found in an annotated corpus")]
pub struct Config {
    /// Directory holding one annotated XML document per text.
    #[arg(env = "CORPUS_DIR")]
    pub corpus_dir: PathBuf,
}

impl Config {
    pub fn new(corpus_dir: impl Into<PathBuf>) -> Self {
        Self {
            corpus_dir: corpus_dir.into(),
        }
    }
}
