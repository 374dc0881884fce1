//! Shared identifier algebra and record types for annotated corpus documents.
//!
//! Morpheme identifiers encode their position in the corpus as four
//! `_`-separated components: `<text>_<sentence>_<word>_<morpheme>`, e.g.
//! `T1_S1_W12_M1`. The word component is a single letter followed by the word
//! number. [`MorphemeId`] parses an identifier once and exposes the pieces;
//! [`is_adjacent`] decides whether two identifiers belong to consecutive words
//! of the same sentence.
//!
//! ```rust
//! use verbex_types::{MorphemeId, VerbClass, is_adjacent};
//!
//! let id = MorphemeId::parse("T1_S1_W12_M1").unwrap();
//! assert_eq!(id.word_number(), 12);
//! assert_eq!(id.word_id(), "T1_S1_W12");
//! assert_eq!(id.phrase_id(), "T1_S1");
//! assert!(is_adjacent("T1_S1_W12_M1", "T1_S1_W11_M3").unwrap());
//! assert_eq!(VerbClass::from_tag("VT"), Some(VerbClass::Transitive));
//! ```

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// Separator between identifier components.
pub const ID_SEPARATOR: char = '_';

/// Reference value marking a part-of-speech tag whose morpheme was not resolved.
pub const ERR_REFERENCE: &str = "err";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("identifier {id:?} has {found} components, expected 4")]
    ComponentCount { id: String, found: usize },
    #[error("identifier {id:?} has malformed word component {component:?}")]
    WordComponent { id: String, component: String },
}

/// Verb classification carried by a part-of-speech tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum VerbClass {
    Intransitive,
    Transitive,
}

impl VerbClass {
    /// Classify a part-of-speech tag value; only `vi`/`vt` (any case) are verbs.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "vi" => Some(VerbClass::Intransitive),
            "vt" => Some(VerbClass::Transitive),
            _ => None,
        }
    }

    /// Tag form as used in the corpus markup (lower-case).
    pub fn as_tag(self) -> &'static str {
        match self {
            VerbClass::Intransitive => "vi",
            VerbClass::Transitive => "vt",
        }
    }
}

impl fmt::Display for VerbClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Verb root found in a document, keyed by its morpheme identifier.
///
/// `text` stays `None` when no morpheme element carried the identifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verb {
    pub class: VerbClass,
    pub text: Option<String>,
}

/// Sentence-level phrase with its plain text and `ignore` annotation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Phrase {
    pub ignore: Option<String>,
    pub text: String,
}

/// Parsed `<text>_<sentence>_<word>_<morpheme>` identifier.
///
/// The raw string is kept so derived ids ([`word_id`](Self::word_id),
/// [`phrase_id`](Self::phrase_id)) are prefixes of it, exactly as they appear
/// as keys in the word and phrase tables.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MorphemeId {
    raw: String,
    text_end: usize,
    sentence_end: usize,
    word_end: usize,
    word_number: u32,
    morpheme_number: Option<u32>,
}

impl MorphemeId {
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let parts: Vec<&str> = raw.split(ID_SEPARATOR).collect();
        if parts.len() != 4 {
            return Err(IdError::ComponentCount {
                id: raw.to_string(),
                found: parts.len(),
            });
        }

        let word_number =
            parse_numbered_component(parts[2]).ok_or_else(|| IdError::WordComponent {
                id: raw.to_string(),
                component: parts[2].to_string(),
            })?;
        let morpheme_number = parse_numbered_component(parts[3]);

        let text_end = parts[0].len();
        let sentence_end = text_end + 1 + parts[1].len();
        let word_end = sentence_end + 1 + parts[2].len();

        Ok(Self {
            raw: raw.to_string(),
            text_end,
            sentence_end,
            word_end,
            word_number,
            morpheme_number,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn text_id(&self) -> &str {
        &self.raw[..self.text_end]
    }

    pub fn sentence_id(&self) -> &str {
        &self.raw[self.text_end + 1..self.sentence_end]
    }

    pub fn word_number(&self) -> u32 {
        self.word_number
    }

    /// Morpheme number, if the component follows the letter+digits scheme.
    pub fn morpheme_number(&self) -> Option<u32> {
        self.morpheme_number
    }

    /// Identifier of the owning word (morpheme component dropped).
    pub fn word_id(&self) -> &str {
        &self.raw[..self.word_end]
    }

    /// Identifier of the owning phrase (word and morpheme components dropped).
    pub fn phrase_id(&self) -> &str {
        &self.raw[..self.sentence_end]
    }

    /// True when both ids sit in the same text and sentence and their word
    /// numbers differ by exactly one.
    pub fn is_adjacent(&self, other: &MorphemeId) -> bool {
        self.text_id() == other.text_id()
            && self.sentence_id() == other.sentence_id()
            && self.word_number.abs_diff(other.word_number) == 1
    }

    /// Reading order: text and sentence by name, then word and morpheme by
    /// number. Unlike plain string order, `W2` sorts before `W10`.
    pub fn reading_cmp(&self, other: &MorphemeId) -> Ordering {
        self.text_id()
            .cmp(other.text_id())
            .then_with(|| self.sentence_id().cmp(other.sentence_id()))
            .then_with(|| self.word_number.cmp(&other.word_number))
            .then_with(|| self.morpheme_number.cmp(&other.morpheme_number))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl fmt::Display for MorphemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Adjacency rule over raw identifiers. Fails if either word component is
/// not a letter followed by digits.
pub fn is_adjacent(id1: &str, id2: &str) -> Result<bool, IdError> {
    let a = MorphemeId::parse(id1)?;
    let b = MorphemeId::parse(id2)?;
    Ok(a.is_adjacent(&b))
}

/// Parse a component like `W12`: one ASCII letter, then decimal digits.
fn parse_numbered_component(component: &str) -> Option<u32> {
    let mut chars = component.chars();
    let prefix = chars.next()?;
    if !prefix.is_ascii_alphabetic() {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
