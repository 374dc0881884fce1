//! Turn raw document bytes into text for the XML parser.
//!
//! The byte-order mark wins, then the `encoding` pseudo-attribute of a leading
//! `<?xml ...?>` declaration; a document with neither is UTF-8. Labels are
//! resolved with `encoding_rs`, so `ISO-8859-1`/`latin1` decode as
//! windows-1252.

use std::borrow::Cow;

use anyhow::{Context, Result, bail};
use encoding_rs::{Encoding, UTF_8};

/// How far into a document the XML declaration may reach.
const DECLARATION_LIMIT: usize = 256;

/// Decode a whole document. UTF-8 input is borrowed, not copied.
///
/// Malformed byte sequences are an error rather than replacement characters.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?, bytes),
    };
    match encoding.decode_without_bom_handling_and_without_replacement(body) {
        Some(text) => Ok(text),
        None => bail!("document is not valid {}", encoding.name()),
    }
}

fn declared_encoding(bytes: &[u8]) -> Result<&'static Encoding> {
    let Some(label) = declaration_label(bytes) else {
        return Ok(UTF_8);
    };
    Encoding::for_label(label).with_context(|| {
        format!(
            "unsupported document encoding {:?}",
            String::from_utf8_lossy(label)
        )
    })
}

/// Value of `encoding="..."` in a leading XML declaration, if any.
fn declaration_label(bytes: &[u8]) -> Option<&[u8]> {
    let head = &bytes[..bytes.len().min(DECLARATION_LIMIT)];
    let rest = head.strip_prefix(b"<?xml")?;
    if !rest.first()?.is_ascii_whitespace() {
        return None;
    }
    let end = rest.windows(2).position(|w| w == b"?>")?;
    let decl = &rest[..end];

    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let value = decl[at + 8..].trim_ascii_start().strip_prefix(b"=")?;
    let (&quote, value) = value.trim_ascii_start().split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let close = value.iter().position(|&b| b == quote)?;
    Some(&value[..close])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_the_declared_label() {
        let doc = b"<?xml version=\"1.0\" encoding='ISO-8859-1' ?>\n<text/>";
        assert_eq!(declaration_label(doc), Some(&b"ISO-8859-1"[..]));
        assert_eq!(declaration_label(b"<?xml version=\"1.0\"?><text/>"), None);
        assert_eq!(declaration_label(b"<text/>"), None);
        assert_eq!(declaration_label(b"<?xml-stylesheet encoding=\"x\"?>"), None);
    }

    #[test]
    fn decodes_latin1_documents() {
        let doc = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><trans>a\xF1o</trans>";
        let text = decode_document(doc).unwrap();
        assert!(text.ends_with("<trans>año</trans>"));
    }

    #[test]
    fn utf8_is_borrowed() {
        let doc = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><trans>año</trans>".as_bytes();
        assert!(matches!(decode_document(doc).unwrap(), Cow::Borrowed(_)));
        assert!(matches!(decode_document(b"<trans/>").unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let doc = b"\xEF\xBB\xBF<trans>x</trans>";
        assert_eq!(decode_document(doc).unwrap(), "<trans>x</trans>");
    }

    #[test]
    fn undeclared_latin1_bytes_are_rejected() {
        let err = decode_document(b"<trans>a\xF1o</trans>").unwrap_err();
        assert!(err.to_string().contains("UTF-8"), "{err}");
    }

    #[test]
    fn unknown_label_is_rejected() {
        let doc = b"<?xml version=\"1.0\" encoding=\"klingon\"?><text/>";
        let err = decode_document(doc).unwrap_err();
        assert!(err.to_string().contains("klingon"), "{err}");
    }
}
