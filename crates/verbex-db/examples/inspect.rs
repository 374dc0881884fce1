use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use verbex_db::{DocumentIndex, decode_document, document_paths};

fn main() -> Result<()> {
    let corpus_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p verbex-db --example inspect -- <path-to-corpus-dir>")?;

    let paths = document_paths(&corpus_dir)?;
    let first = paths
        .first()
        .with_context(|| format!("no documents in {}", corpus_dir.display()))?;
    println!("Processing file: {}", first.display());

    let bytes = fs::read(first).with_context(|| format!("read {}", first.display()))?;
    let index = DocumentIndex::parse(&decode_document(&bytes)?)?;

    println!("Verbs        : {} ({} dangling)", index.verbs.len(), index.dangling_verbs());
    println!("Words        : {}", index.words.len());
    println!("Phrases      : {}", index.phrases.len());
    println!("Translations : {}", index.translations.len());

    let mut words: Vec<(&String, &String)> = index.words.iter().collect();
    words.sort();
    println!("\nThe words are:");
    for (id, text) in words {
        println!("  {id:<16} {text}");
    }

    Ok(())
}
