use std::fs;
use notes2md_engine::{create_fresh_dir, ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_and_is_atomic() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("note.md", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "note.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    // Replace existing
    let second = writer.write("note.md", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
    // Only the target is left behind, no temp files.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("note.md", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("note.md").exists());
}

#[test]
fn fresh_dir_creates_parents() {
    let temp = TempDir::new().unwrap();
    let session = temp.path().join("out").join("2024-01-01_00-00-00.000000");
    create_fresh_dir(&session).unwrap();
    assert!(session.is_dir());
}

#[test]
fn fresh_dir_refuses_to_reuse_existing_dir() {
    let temp = TempDir::new().unwrap();
    let session = temp.path().join("out").join("s1");
    fs::create_dir_all(&session).unwrap();
    fs::write(session.join("keep.md"), "keep").unwrap();

    let err = create_fresh_dir(&session).unwrap_err();
    assert!(matches!(err, PersistError::AlreadyExists(ref p) if p == &session));
    assert_eq!(fs::read_to_string(session.join("keep.md")).unwrap(), "keep");
}

#[test]
fn writer_does_not_create_its_directory() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("out");

    let writer = AtomicFileWriter::new(missing.clone());
    assert!(writer.write("note.md", "data").is_err());
    assert!(!missing.exists());
}

#[test]
fn writes_leave_only_markdown_behind() {
    let temp = TempDir::new().unwrap();
    ensure_output_dir(temp.path()).unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    writer.write("a.md", "a").unwrap();
    writer.write("b.md", "b").unwrap();

    let mut names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    names.sort();
    assert_eq!(names, ["a.md", "b.md"]);
}
