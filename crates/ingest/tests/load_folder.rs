//! Tests for loading and normalizing text files from a folder.

use std::fs;

use ragchunk_ingest::{load_text_files_from_folder, LoadError};

#[test]
fn loads_txt_and_md_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.md"), "# Title\n\nBody text.\n").unwrap();
    fs::write(dir.path().join("a.txt"), "line one\r\n\r\n  line\u{00a0}two  \r\n").unwrap();
    fs::write(dir.path().join("c.pdf"), "%PDF-1.4").unwrap();
    fs::write(dir.path().join("d.txt.bak"), "backup").unwrap();

    let docs = load_text_files_from_folder(dir.path()).unwrap();

    let sources: Vec<&str> = docs.iter().map(|d| d.source.as_str()).collect();
    assert_eq!(sources, vec!["a.txt", "b.md"]);
    assert_eq!(docs[0].content, "line one\nline two");
    assert_eq!(docs[1].content, "# Title\nBody text.");
}

#[test]
fn does_not_recurse_into_subfolders() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested.txt");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("inner.txt"), "hidden").unwrap();
    fs::write(dir.path().join("top.txt"), "visible").unwrap();

    let docs = load_text_files_from_folder(dir.path()).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].source, "top.txt");
    assert_eq!(docs[0].content, "visible");
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.txt"), [b'o', b'k', 0xff, b'\n']).unwrap();

    let docs = load_text_files_from_folder(dir.path()).unwrap();

    assert_eq!(docs[0].content, "ok\u{fffd}");
}

#[test]
fn empty_folder_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_text_files_from_folder(dir.path()).unwrap().is_empty());
}

#[test]
fn missing_folder_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = load_text_files_from_folder(&missing).unwrap_err();

    assert!(matches!(err, LoadError::Walk { .. }));
    assert!(err.to_string().contains("does-not-exist"));
}
