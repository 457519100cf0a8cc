use std::path::{Path, PathBuf};

use crate::config::{ATTACHMENTS_DIR, IMAGES_DIR};
use crate::error::ValidationError;
use crate::ValidationIssue;

/// Check the source directory's shape without touching the filesystem.
///
/// Every check runs; all problems are returned together.
pub fn validate_source(source: &Path, root: &Path) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    if !source.is_dir() {
        issues.push(ValidationIssue::SourceMissing(source.to_path_buf()));
    }
    for name in [ATTACHMENTS_DIR, IMAGES_DIR] {
        if !source.join(name).is_dir() {
            issues.push(ValidationIssue::MissingSubdirectory {
                source: source.to_path_buf(),
                name,
            });
        }
    }
    if source.is_dir() && contains_root(source, root) {
        issues.push(ValidationIssue::SourceContainsRoot {
            source: source.to_path_buf(),
            root: root.to_path_buf(),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

/// Staging a source that holds `tmp/` would copy the staging area into itself.
fn contains_root(source: &Path, root: &Path) -> bool {
    let Ok(source) = source.canonicalize() else {
        return false;
    };
    let root: PathBuf = match root.canonicalize() {
        Ok(path) => path,
        Err(_) => match std::path::absolute(root) {
            Ok(path) => path,
            Err(_) => return false,
        },
    };
    root.starts_with(&source)
}
