//! Per-document extractors.
//!
//! Each extractor walks one parsed document and returns a flat table keyed by
//! the identifier attribute of the elements it reads:
//!
//! | extractor                | elements                                   | key       |
//! |--------------------------|--------------------------------------------|-----------|
//! | [`extract_verbs`]        | `pos[morph_ref,text]`, `morph[morph_id,text]` | morpheme |
//! | [`extract_words`]        | `word[wd_id,text]`                         | word      |
//! | [`extract_phrases`]      | `body/phrases/phrase[ph_id,ignore]/plaintext` | phrase |
//! | [`extract_translations`] | `body/translations/phrase[ph_id]/trans`    | phrase    |

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use roxmltree::{Document, Node, ParsingOptions};
use verbex_types::{ERR_REFERENCE, Phrase, Verb, VerbClass};

/// Everything extracted from a single document.
#[derive(Clone, Debug, Default)]
pub struct DocumentIndex {
    pub verbs: HashMap<String, Verb>,
    pub words: HashMap<String, String>,
    pub phrases: HashMap<String, Phrase>,
    pub translations: HashMap<String, String>,
}

impl DocumentIndex {
    /// Parse XML text and run all four extractors over it.
    pub fn parse(xml: &str) -> Result<Self> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(xml, options).context("parse xml")?;
        Self::from_root(doc.root_element())
    }

    /// Run all four extractors over an already parsed document root.
    pub fn from_root(root: Node<'_, '_>) -> Result<Self> {
        Ok(Self {
            verbs: extract_verbs(root)?,
            words: extract_words(root)?,
            phrases: extract_phrases(root)?,
            translations: extract_translations(root)?,
        })
    }

    /// Verbs whose morpheme text was never found in this document.
    pub fn dangling_verbs(&self) -> usize {
        self.verbs.values().filter(|v| v.text.is_none()).count()
    }
}

/// Collect verbs from `pos` tags, then fill in their text from `morph` tags.
pub fn extract_verbs(root: Node<'_, '_>) -> Result<HashMap<String, Verb>> {
    let mut verbs = HashMap::new();

    for pos in elements(root, "pos") {
        let morph_ref = required_attr(pos, "morph_ref")?;
        if morph_ref == ERR_REFERENCE {
            continue;
        }
        if let Some(class) = VerbClass::from_tag(required_attr(pos, "text")?) {
            verbs.insert(morph_ref.to_string(), Verb { class, text: None });
        }
    }

    for morph in elements(root, "morph") {
        let id = required_attr(morph, "morph_id")?;
        if let Some(verb) = verbs.get_mut(id) {
            verb.text = Some(required_attr(morph, "text")?.to_lowercase());
        }
    }

    Ok(verbs)
}

pub fn extract_words(root: Node<'_, '_>) -> Result<HashMap<String, String>> {
    elements(root, "word")
        .map(|word| -> Result<(String, String)> {
            Ok((
                required_attr(word, "wd_id")?.to_string(),
                required_attr(word, "text")?.to_string(),
            ))
        })
        .collect()
}

pub fn extract_phrases(root: Node<'_, '_>) -> Result<HashMap<String, Phrase>> {
    let section = body_section(root, "phrases")?;
    children(section, "phrase")
        .map(|phrase| -> Result<(String, Phrase)> {
            let id = required_attr(phrase, "ph_id")?;
            let text = nested_text(phrase, "plaintext")
                .with_context(|| format!("phrase {id}"))?;
            Ok((
                id.to_string(),
                Phrase {
                    ignore: phrase.attribute("ignore").map(str::to_string),
                    text: text.to_string(),
                },
            ))
        })
        .collect()
}

pub fn extract_translations(root: Node<'_, '_>) -> Result<HashMap<String, String>> {
    let section = body_section(root, "translations")?;
    children(section, "phrase")
        .map(|phrase| -> Result<(String, String)> {
            let id = required_attr(phrase, "ph_id")?;
            let text =
                nested_text(phrase, "trans").with_context(|| format!("translation {id}"))?;
            Ok((id.to_string(), text.to_string()))
        })
        .collect()
}

fn elements<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    root.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn body_section<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    name: &'static str,
) -> Result<Node<'a, 'input>> {
    let body = children(root, "body")
        .next()
        .ok_or_else(|| anyhow!("document has no <body> element"))?;
    children(body, name)
        .next()
        .ok_or_else(|| anyhow!("document has no <body>/<{name}> section"))
}

/// Trimmed text of the first `<name>` child; absent element or text is an error.
fn nested_text<'a>(node: Node<'a, '_>, name: &'static str) -> Result<&'a str> {
    let child = children(node, name)
        .next()
        .ok_or_else(|| anyhow!("missing <{name}> element"))?;
    child
        .text()
        .map(str::trim)
        .ok_or_else(|| anyhow!("<{name}> element has no text"))
}

fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        anyhow!(
            "<{}> element is missing attribute {name:?}",
            node.tag_name().name()
        )
    })
}
