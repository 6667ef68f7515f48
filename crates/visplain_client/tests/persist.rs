use std::fs;

use tempfile::TempDir;
use visplain_client::{ensure_output_dir, AtomicFileWriter};

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("pages"));

    let first = writer.write("graph.html", "<p>one</p>").unwrap();
    assert_eq!(first.file_name().unwrap(), "graph.html");
    assert_eq!(fs::read_to_string(&first).unwrap(), "<p>one</p>");

    let second = writer.write("graph.html", b"<p>two</p>").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "<p>two</p>");
}

#[test]
fn rejects_names_with_path_separators() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    assert!(writer.write("../escape.html", "x").is_err());
    assert!(writer.write("", "x").is_err());
    assert!(!temp.path().join("escape.html").exists());
}

#[test]
fn no_partial_file_when_target_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("page.html", "data").is_err());
    assert!(!file_path.with_file_name("page.html").exists());
}
