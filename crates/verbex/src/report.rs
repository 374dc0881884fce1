use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use verbex_db::Corpus;
use verbex_pairs::{VerbPair, adjacent_pairs};

use crate::config::Config;

/// Shown for a phrase without an `ignore` attribute.
const NO_IGNORE_FLAG: &str = "None";

/// Sizes observed during one run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub documents: usize,
    pub verbs: usize,
    pub words: usize,
    pub phrases: usize,
    pub translations: usize,
    pub pairs: usize,
}

/// Load the corpus named by `config` and write the adjacent-pair report.
pub fn run<W: Write>(config: &Config, mut out: W) -> Result<RunSummary> {
    let start = Instant::now();
    let corpus = Corpus::load(&config.corpus_dir)
        .with_context(|| format!("loading corpus from {}", config.corpus_dir.display()))?;
    info!("corpus loaded in {} ms", start.elapsed().as_millis());

    let summary = write_report(&mut out, &corpus)?;
    out.flush()?;
    Ok(summary)
}

/// Write index sizes, the pair count and one record per adjacent pair.
///
/// Every pair is resolved before anything is written, so a missing phrase
/// leaves `out` untouched.
pub fn write_report<W: Write>(out: &mut W, corpus: &Corpus) -> Result<RunSummary> {
    let pairs = adjacent_pairs(corpus)?.collect::<Result<Vec<_>, _>>()?;
    info!("adjacent pairs: {}", pairs.len());

    writeln!(out, "Size of verb dictionary: {}", corpus.verb_count())?;
    writeln!(out, "Size of word dictionary: {}", corpus.word_count())?;
    writeln!(out, "Size of phrase dictionary: {}", corpus.phrase_count())?;
    writeln!(
        out,
        "Size of translated phrases dictionary: {}",
        corpus.translation_count()
    )?;
    writeln!(out, "Number of adjacent pairs: {}", pairs.len())?;
    writeln!(out)?;

    for (idx, pair) in pairs.iter().enumerate() {
        write_pair(out, idx + 1, pair)?;
    }

    Ok(RunSummary {
        documents: corpus.document_count(),
        verbs: corpus.verb_count(),
        words: corpus.word_count(),
        phrases: corpus.phrase_count(),
        translations: corpus.translation_count(),
        pairs: pairs.len(),
    })
}

/// Write one numbered pair record followed by a blank line.
pub fn write_pair<W: Write>(out: &mut W, number: usize, pair: &VerbPair<'_>) -> Result<()> {
    writeln!(out, "{number}")?;
    writeln!(out, "id:\t\t{} ; {}", pair.first.id, pair.second.id)?;
    writeln!(out, "words:\t{} ; {}", pair.first.word, pair.second.word)?;
    writeln!(
        out,
        "tags:\t{} ; {}",
        pair.first.verb.class, pair.second.verb.class
    )?;
    writeln!(
        out,
        "phrase:\tignore={} ; text={}",
        pair.phrase.ignore.as_deref().unwrap_or(NO_IGNORE_FLAG),
        pair.phrase.text
    )?;
    writeln!(out, "es_trans:\t{}", pair.translation)?;
    writeln!(out)?;
    Ok(())
}
