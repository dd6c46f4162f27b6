//! ファイルの読み込みと保存の往復テスト

use kg::file::{self, FileContent, FileReader};
use kg::{Cursor, Editor};
use std::fs;

fn opened(bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf, Editor) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    fs::write(&path, bytes).unwrap();

    let mut editor = Editor::new();
    file::open(&mut editor, path.to_str().unwrap()).unwrap();
    (dir, path, editor)
}

#[test]
fn unchanged_file_saves_identically() {
    let (_dir, path, mut editor) = opened(b"first\n\tsecond\n\nlast\n");
    assert_eq!(editor.store().row_count(), 4);
    assert!(!editor.is_dirty());

    let written = file::save(&mut editor).unwrap();
    assert_eq!(written, 20);
    assert_eq!(fs::read(&path).unwrap(), b"first\n\tsecond\n\nlast\n");
}

#[test]
fn missing_trailing_newline_is_preserved() {
    let (_dir, path, mut editor) = opened(b"alpha\nbeta");
    assert!(!editor.store().trailing_newline());

    editor.set_cursor(Cursor::new(1, 4));
    editor.insert_char(b'!').unwrap();
    file::save(&mut editor).unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"alpha\nbeta!");
}

#[test]
fn crlf_line_endings_are_stripped() {
    let (_dir, path, mut editor) = opened(b"one\r\ntwo\r\n");
    assert_eq!(editor.row_text(0), Some(&b"one"[..]));
    assert_eq!(editor.row_text(1), Some(&b"two"[..]));

    file::save(&mut editor).unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"one\ntwo\n");
}

#[test]
fn missing_file_opens_empty_and_creates_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.rs");

    let mut editor = Editor::new();
    file::open(&mut editor, path.to_str().unwrap()).unwrap();
    assert!(editor.store().is_empty());
    assert!(editor.store().profile().is_some());

    for &byte in b"fn main" {
        editor.insert_char(byte).unwrap();
    }
    assert!(editor.is_dirty());
    assert_eq!(file::save(&mut editor).unwrap(), 8);
    assert!(!editor.is_dirty());
    assert_eq!(fs::read(&path).unwrap(), b"fn main\n");
}

#[test]
fn undo_back_to_saved_state_is_clean() {
    let (_dir, _path, mut editor) = opened(b"text\n");
    editor.insert_char(b'x').unwrap();
    file::save(&mut editor).unwrap();

    editor.insert_char(b'y').unwrap();
    assert!(editor.is_dirty());
    editor.undo().unwrap();
    assert!(!editor.is_dirty());

    editor.undo().unwrap();
    assert!(editor.is_dirty());
}

#[test]
fn failed_save_keeps_buffer_dirty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("doc.txt");

    let mut editor = Editor::new();
    file::open(&mut editor, path.to_str().unwrap()).unwrap();
    editor.insert_char(b'a').unwrap();

    assert!(file::save(&mut editor).is_err());
    assert!(editor.is_dirty());
    assert_eq!(editor.row_text(0), Some(&b"a"[..]));
}

#[test]
fn unnamed_buffer_cannot_be_saved() {
    let mut editor = Editor::new();
    editor.insert_char(b'a').unwrap();
    assert!(file::save(&mut editor).is_err());
}

#[test]
fn directory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    assert!(FileReader::new().read_file(dir.path()).is_err());
}

#[test]
fn empty_file_parses_to_no_rows() {
    let content = FileContent::parse(b"");
    assert!(content.rows.is_empty());
    assert!(content.trailing_newline);

    let content = FileContent::parse(b"\n");
    assert_eq!(content.rows, vec![Vec::<u8>::new()]);
}
