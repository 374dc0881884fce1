use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use verbex_db::{Corpus, LoadMode, document_paths};
use verbex_types::VerbClass;

fn fixtures(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_dir() -> PathBuf {
    fixtures("corpus")
}

fn minimal_doc(phrase_id: &str, words: &[(&str, &str)]) -> String {
    let words: String = words
        .iter()
        .map(|(id, text)| format!(r#"<word wd_id="{id}" text="{text}"/>"#))
        .collect();
    format!(
        r#"<text><body><phrases><phrase ph_id="{phrase_id}"><plaintext>p</plaintext>{words}</phrase></phrases><translations/></body></text>"#
    )
}

#[test]
fn builds_all_four_indexes() {
    let corpus = Corpus::load(fixture_dir()).expect("load fixtures");
    assert_eq!(corpus.document_count(), 2);
    assert_eq!(corpus.verb_count(), 7);
    assert_eq!(corpus.word_count(), 8);
    assert_eq!(corpus.phrase_count(), 3);
    assert_eq!(corpus.translation_count(), 2);
}

#[test]
fn resolves_verb_text_and_class() {
    let corpus = Corpus::load(fixture_dir()).expect("load fixtures");

    let xin = corpus.verb("T1_S1_W1_M1").expect("xin is a verb");
    assert_eq!(xin.class, VerbClass::Transitive);
    assert_eq!(xin.text.as_deref(), Some("xin"));

    let kam = corpus.verb("T1_S1_W2_M2").expect("kam is a verb");
    assert_eq!(kam.class, VerbClass::Intransitive);
    assert_eq!(kam.text.as_deref(), Some("kam"));

    assert!(corpus.verb("T1_S1_W2_M1").is_none());
    assert!(corpus.verb("err").is_none());

    let dangling = corpus.verb("T2_S1_W11_M1").expect("dangling verb kept");
    assert_eq!(dangling.text, None);
}

#[test]
fn trims_phrase_and_translation_text() {
    let corpus = Corpus::load(fixture_dir()).expect("load fixtures");
    let phrase = corpus.phrase("T1_S1").expect("phrase present");
    assert_eq!(phrase.text, "Xin kam tinb'ij");
    assert_eq!(phrase.ignore.as_deref(), Some("no"));
    assert_eq!(corpus.phrase("T2_S1").unwrap().ignore, None);
    assert_eq!(corpus.translation("T1_S1"), Some("Se fue a decir"));
    assert_eq!(corpus.translation("T1_S2"), None);
}

#[test]
fn load_modes_agree() {
    let mapped = Corpus::load_with_mode(fixture_dir(), LoadMode::Mmap).unwrap();
    let owned = Corpus::load_with_mode(fixture_dir(), LoadMode::Owned).unwrap();
    assert_eq!(mapped.verb_count(), owned.verb_count());
    assert_eq!(mapped.word("T2_S1_W10"), owned.word("T2_S1_W10"));
    assert_eq!(mapped.word("T2_S1_W10"), Some("kinchaj"));
}

#[test]
fn decodes_documents_in_their_declared_encoding() {
    for mode in [LoadMode::Mmap, LoadMode::Owned] {
        let corpus = Corpus::load_with_mode(fixtures("latin1"), mode).expect("load latin-1");
        assert_eq!(corpus.translation("T3_S1"), Some("El niño se cayó este año"));
        assert_eq!(corpus.word("T3_S1_W3"), Some("ak'al"));
        assert_eq!(
            corpus.verb("T3_S1_W1_M1").and_then(|v| v.text.as_deref()),
            Some("tzaq")
        );
    }
}

#[test]
fn undeclared_non_utf8_document_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.xml"),
        b"<text><body><phrases/><translations><phrase ph_id=\"T1_S1\"><trans>a\xF1o</trans></phrase></translations></body></text>",
    )
    .unwrap();

    let err = Corpus::load_with_mode(dir.path(), LoadMode::Owned).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("a.xml"), "{message}");
    assert!(message.contains("UTF-8"), "{message}");
}

#[test]
fn word_table_matches_the_document_exactly() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.xml"),
        minimal_doc("T1_P1", &[("T1_P1_W1", "Xa"), ("T1_P1_W2", "Xb")]),
    )
    .unwrap();

    let corpus = Corpus::load(dir.path()).unwrap();
    let words: HashMap<&str, &str> = corpus.words().collect();
    let expected = HashMap::from([("T1_P1_W1", "Xa"), ("T1_P1_W2", "Xb")]);
    assert_eq!(words, expected);
}

#[test]
fn later_file_wins_on_key_collision() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.xml"),
        minimal_doc("T1_S1", &[("T1_S1_W1", "old"), ("T1_S1_W2", "only-a")]),
    )
    .unwrap();
    fs::write(
        dir.path().join("b.xml"),
        minimal_doc("T1_S1", &[("T1_S1_W1", "new")]),
    )
    .unwrap();

    let corpus = Corpus::load_with_mode(dir.path(), LoadMode::Owned).unwrap();
    assert_eq!(corpus.word("T1_S1_W1"), Some("new"));
    assert_eq!(corpus.word("T1_S1_W2"), Some("only-a"));
    assert_eq!(corpus.phrase_count(), 1);
}

#[test]
fn skips_subdirectories_and_sorts_by_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("b.xml"), minimal_doc("T2_S1", &[])).unwrap();
    fs::write(dir.path().join("a.xml"), minimal_doc("T1_S1", &[])).unwrap();

    let names: Vec<String> = document_paths(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.xml", "b.xml"]);
}

#[test]
fn malformed_document_aborts_the_load() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.xml"), minimal_doc("T1_S1", &[])).unwrap();
    fs::write(
        dir.path().join("b.xml"),
        "<text><body><phrases/></body></text>",
    )
    .unwrap();

    let err = Corpus::load(dir.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("b.xml"), "{message}");
    assert!(message.contains("translations"), "{message}");
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Corpus::load(dir.path().join("absent")).is_err());
}
