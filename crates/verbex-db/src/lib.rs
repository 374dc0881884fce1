//! Build corpus-wide indexes from a directory of annotated XML documents.
//!
//! Every document contributes four tables (see [`DocumentIndex`]): verbs keyed
//! by morpheme id, words keyed by word id, phrases and translations keyed by
//! phrase id. [`Corpus`] merges them across documents; on a key collision the
//! document loaded later wins. Files are visited in file-name order so the
//! outcome of a collision does not depend on the platform's directory order.
//!
//! Documents may be in any encoding named by their XML declaration (see
//! [`decode_document`]). Callers choose how the bytes are read via
//! [`LoadMode`].
//!
//! # Example
//! ```no_run
//! use verbex_db::{Corpus, LoadMode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let corpus = Corpus::load_with_mode("/path/to/corpus", LoadMode::Owned)?;
//! println!("verbs: {}", corpus.verb_count());
//! if let Some(word) = corpus.word("T4_P70_W1") {
//!     println!("first word: {word}");
//! }
//! # Ok(()) }
//! ```

mod decode;
mod extract;

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use memmap2::Mmap;
use tracing::{debug, info, warn};
use verbex_types::{Phrase, Verb};

pub use decode::decode_document;
pub use extract::{
    DocumentIndex, extract_phrases, extract_translations, extract_verbs, extract_words,
};

/// How document bytes reach the decoder.
///
/// A corpus is mostly UTF-8 documents, which decode without a copy; mapping
/// lets the parser run straight over the page cache. Documents in other
/// encodings are transcoded into an owned string either way.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    #[default]
    Mmap,
    /// Read the whole file into memory, for filesystems that cannot be mapped.
    Owned,
}

/// Raw bytes of one document, alive only while it is parsed.
enum DocumentBytes {
    Mapped(Mmap),
    Read(Vec<u8>),
}

impl DocumentBytes {
    fn open(path: &Path, mode: LoadMode) -> Result<Self> {
        let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        match mode {
            LoadMode::Mmap => {
                // SAFETY: the map is dropped once this document is merged and
                // nothing borrowed from it outlives the parse. Files must not be
                // truncated while the corpus is loading.
                let map = unsafe { Mmap::map(&file) }
                    .with_context(|| format!("mmap {}", path.display()))?;
                Ok(Self::Mapped(map))
            }
            LoadMode::Owned => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)
                    .with_context(|| format!("read {}", path.display()))?;
                Ok(Self::Read(bytes))
            }
        }
    }
}

impl Deref for DocumentBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(map) => &map[..],
            Self::Read(bytes) => bytes.as_slice(),
        }
    }
}

/// Corpus-wide verb, word, phrase and translation tables.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    verbs: HashMap<String, Verb>,
    words: HashMap<String, String>,
    phrases: HashMap<String, Phrase>,
    translations: HashMap<String, String>,
    documents: usize,
}

impl Corpus {
    /// Load every regular file in `corpus_dir` as a document.
    ///
    /// Defaults to memory-mapping the files. Use [`load_with_mode`] to force
    /// owned buffers instead.
    ///
    /// [`load_with_mode`]: Corpus::load_with_mode
    pub fn load(corpus_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(corpus_dir, LoadMode::default())
    }

    /// Load every regular file in `corpus_dir`, choosing how files are read.
    ///
    /// Any unreadable or malformed document aborts the whole load.
    pub fn load_with_mode(corpus_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = corpus_dir.as_ref();
        let mut corpus = Self::default();
        for path in document_paths(dir)? {
            corpus
                .load_document(&path, mode)
                .with_context(|| format!("document {}", path.display()))?;
        }

        info!("documents loaded: {}", corpus.documents);
        info!("size of verb index: {}", corpus.verb_count());
        info!("size of word index: {}", corpus.word_count());
        info!("size of phrase index: {}", corpus.phrase_count());
        info!("size of translation index: {}", corpus.translation_count());
        let dangling = corpus.verbs.values().filter(|v| v.text.is_none()).count();
        if dangling > 0 {
            warn!("{dangling} verbs reference a morpheme that was never found");
        }
        Ok(corpus)
    }

    /// Parse one in-memory XML document and merge it into the corpus.
    pub fn insert_document(&mut self, xml: &str) -> Result<()> {
        let index = DocumentIndex::parse(xml)?;
        self.absorb(index);
        Ok(())
    }

    /// Merge an extracted document; its entries replace any existing ones.
    pub fn absorb(&mut self, index: DocumentIndex) {
        self.verbs.extend(index.verbs);
        self.words.extend(index.words);
        self.phrases.extend(index.phrases);
        self.translations.extend(index.translations);
        self.documents += 1;
    }

    pub fn verb(&self, morpheme_id: &str) -> Option<&Verb> {
        self.verbs.get(morpheme_id)
    }

    pub fn word(&self, word_id: &str) -> Option<&str> {
        self.words.get(word_id).map(String::as_str)
    }

    pub fn phrase(&self, phrase_id: &str) -> Option<&Phrase> {
        self.phrases.get(phrase_id)
    }

    pub fn translation(&self, phrase_id: &str) -> Option<&str> {
        self.translations.get(phrase_id).map(String::as_str)
    }

    /// Iterate over all verbs with their morpheme ids, in no particular order.
    pub fn verbs(&self) -> impl Iterator<Item = (&str, &Verb)> + '_ {
        self.verbs.iter().map(|(id, verb)| (id.as_str(), verb))
    }

    /// Iterate over all words with their word ids, in no particular order.
    pub fn words(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.words.iter().map(|(id, text)| (id.as_str(), text.as_str()))
    }

    pub fn verb_count(&self) -> usize {
        self.verbs.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    pub fn translation_count(&self) -> usize {
        self.translations.len()
    }

    /// Number of documents merged so far.
    pub fn document_count(&self) -> usize {
        self.documents
    }

    fn load_document(&mut self, path: &Path, mode: LoadMode) -> Result<()> {
        let bytes = DocumentBytes::open(path, mode)?;
        let text = decode_document(&bytes)?;
        let index = DocumentIndex::parse(&text)?;
        debug!(
            "{}: {} verbs ({} dangling), {} words, {} phrases, {} translations",
            path.display(),
            index.verbs.len(),
            index.dangling_verbs(),
            index.words.len(),
            index.phrases.len(),
            index.translations.len()
        );
        self.absorb(index);
        Ok(())
    }
}

/// Regular files directly inside `dir`, sorted by file name.
pub fn document_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("read corpus directory {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("list {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}
