//! Adjacent verb pairs over a loaded corpus.
//!
//! Two verb morphemes form a pair when their words are consecutive within the
//! same sentence of the same text (see [`MorphemeId::is_adjacent`]).
//!
//! # How it works
//! 1. Parse every verb id in the corpus into a [`MorphemeId`].
//! 2. Put them in reading order: text, sentence, then word and morpheme by
//!    number.
//! 3. Walk consecutive ids and keep the adjacent ones.
//! 4. Resolve each kept pair lazily against the corpus tables.
//!
//! Word and translation misses fall back to [`WORD_NOT_FOUND`] and
//! [`TRANS_NOT_FOUND`]; a missing phrase is an error.
//!
//! # Example
//! ```no_run
//! use verbex_db::Corpus;
//! use verbex_pairs::adjacent_pairs;
//!
//! # fn main() -> anyhow::Result<()> {
//! let corpus = Corpus::load("/path/to/corpus")?;
//! for pair in adjacent_pairs(&corpus)? {
//!     let pair = pair?;
//!     println!("{} {} ; {}", pair.first.id, pair.first.word, pair.second.word);
//! }
//! # Ok(()) }
//! ```

use thiserror::Error;
use tracing::debug;
use verbex_db::Corpus;
use verbex_types::{IdError, MorphemeId, Phrase, Verb};

pub const WORD_NOT_FOUND: &str = "WORD_NOT_FOUND";
pub const TRANS_NOT_FOUND: &str = "TRANS_NOT_FOUND";

#[derive(Debug, Error)]
pub enum PairError {
    #[error("malformed verb identifier: {0}")]
    Id(#[from] IdError),
    #[error("phrase {phrase_id} not found for pair {first} ; {second}")]
    MissingPhrase {
        phrase_id: String,
        first: String,
        second: String,
    },
}

/// One side of an adjacent pair.
#[derive(Clone, Debug)]
pub struct PairMember<'a> {
    pub id: MorphemeId,
    pub verb: &'a Verb,
    /// Surface word owning the verb morpheme, or [`WORD_NOT_FOUND`].
    pub word: &'a str,
}

/// Two verbs in consecutive words, with their shared phrase and translation.
#[derive(Clone, Debug)]
pub struct VerbPair<'a> {
    pub first: PairMember<'a>,
    pub second: PairMember<'a>,
    pub phrase: &'a Phrase,
    /// Phrase translation, or [`TRANS_NOT_FOUND`].
    pub translation: &'a str,
}

impl VerbPair<'_> {
    pub fn phrase_id(&self) -> &str {
        self.first.id.phrase_id()
    }
}

/// Lazy iterator over the adjacent verb pairs of a corpus.
///
/// Built by [`adjacent_pairs`]; single pass.
pub struct AdjacentPairs<'a> {
    corpus: &'a Corpus,
    verbs: Vec<(MorphemeId, &'a Verb)>,
    next: usize,
}

/// Order the corpus verbs and prepare the pair scan.
///
/// Fails if any verb id is malformed; nothing is resolved until the iterator
/// is advanced.
pub fn adjacent_pairs(corpus: &Corpus) -> Result<AdjacentPairs<'_>, PairError> {
    let mut verbs = corpus
        .verbs()
        .map(|(raw, verb)| -> Result<_, IdError> { Ok((MorphemeId::parse(raw)?, verb)) })
        .collect::<Result<Vec<_>, IdError>>()?;
    verbs.sort_by(|(a, _), (b, _)| a.reading_cmp(b));
    debug!("scanning {} verb morphemes for adjacent pairs", verbs.len());

    Ok(AdjacentPairs {
        corpus,
        verbs,
        next: 0,
    })
}

impl<'a> AdjacentPairs<'a> {
    fn resolve(&self, first: usize, second: usize) -> Result<VerbPair<'a>, PairError> {
        let (first_id, first_verb) = &self.verbs[first];
        let (second_id, second_verb) = &self.verbs[second];

        let phrase_id = first_id.phrase_id();
        let phrase = self
            .corpus
            .phrase(phrase_id)
            .ok_or_else(|| PairError::MissingPhrase {
                phrase_id: phrase_id.to_string(),
                first: first_id.to_string(),
                second: second_id.to_string(),
            })?;

        Ok(VerbPair {
            first: self.member(first_id, *first_verb),
            second: self.member(second_id, *second_verb),
            phrase,
            translation: self
                .corpus
                .translation(phrase_id)
                .unwrap_or(TRANS_NOT_FOUND),
        })
    }

    fn member(&self, id: &MorphemeId, verb: &'a Verb) -> PairMember<'a> {
        PairMember {
            id: id.clone(),
            verb,
            word: self.corpus.word(id.word_id()).unwrap_or(WORD_NOT_FOUND),
        }
    }
}

impl<'a> Iterator for AdjacentPairs<'a> {
    type Item = Result<VerbPair<'a>, PairError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next + 1 < self.verbs.len() {
            let i = self.next;
            self.next += 1;
            if self.verbs[i].0.is_adjacent(&self.verbs[i + 1].0) {
                return Some(self.resolve(i, i + 1));
            }
        }
        None
    }
}
