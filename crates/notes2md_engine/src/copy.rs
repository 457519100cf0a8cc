//! Recursive copying with no merge semantics: an existing destination is an error.

use std::fs::{self, File, FileTimes, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use notes2md_logging::{notes_debug, notes_trace};
use thiserror::Error;
use walkdir::WalkDir;

use crate::progress::ProgressSink;
use crate::{ProgressEvent, Stage};

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
    #[error("failed to list {}", .path.display())]
    List { path: PathBuf, source: io::Error },
    #[error("failed to walk {}", .root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to copy {} to {}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Direct children of `dir`, sorted by file name.
pub fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, io::Error> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

/// Copy every entry of `src` into the existing directory `dst`, one progress
/// item per entry. Returns the number of files copied.
pub fn copy_entries(
    src: &Path,
    dst: &Path,
    stage: Stage,
    sink: &dyn ProgressSink,
) -> Result<usize, CopyError> {
    let entries = sorted_entries(src).map_err(|source| CopyError::List {
        path: src.to_path_buf(),
        source,
    })?;
    let total = entries.len();
    sink.emit(ProgressEvent::StageStarted {
        stage,
        total: Some(total),
    });

    let mut files = 0;
    for (i, from) in entries.iter().enumerate() {
        let name = from.file_name().unwrap_or_default();
        let to = dst.join(name);
        if from.is_dir() {
            files += copy_tree(from, &to)?;
        } else {
            copy_file(from, &to)?;
            files += 1;
        }
        sink.emit(ProgressEvent::ItemDone {
            stage,
            index: i + 1,
            total,
            name: name.to_string_lossy().into_owned(),
        });
    }

    sink.emit(ProgressEvent::StageFinished { stage });
    Ok(files)
}

/// Copy the whole subtree at `src` to `dst`, which must not exist yet.
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, CopyError> {
    if dst.exists() {
        return Err(CopyError::DestinationExists(dst.to_path_buf()));
    }

    let mut files = 0;
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| CopyError::Walk {
            root: src.to_path_buf(),
            source,
        })?;
        // Entries always live under `src`.
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir(&target).map_err(|source| io_error(entry.path(), &target, source))?;
        } else {
            copy_file(entry.path(), &target)?;
            files += 1;
        }
    }
    notes_trace!("Copied {} file(s) from {:?} to {:?}", files, src, dst);
    Ok(files)
}

/// Copy one file, keeping its permissions and access/modification times.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), CopyError> {
    let meta = fs::metadata(from).map_err(|source| io_error(from, to, source))?;
    let mut reader = File::open(from).map_err(|source| io_error(from, to, source))?;
    let mut writer = match OpenOptions::new().write(true).create_new(true).open(to) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Err(CopyError::DestinationExists(to.to_path_buf()));
        }
        Err(source) => return Err(io_error(from, to, source)),
    };
    io::copy(&mut reader, &mut writer).map_err(|source| io_error(from, to, source))?;

    if let Err(err) = preserve_times(&writer, &meta) {
        notes_debug!("Could not preserve timestamps on {:?}: {}", to, err);
    }
    drop(writer);
    fs::set_permissions(to, meta.permissions()).map_err(|source| io_error(from, to, source))?;
    Ok(())
}

fn preserve_times(file: &File, meta: &fs::Metadata) -> io::Result<()> {
    let times = FileTimes::new()
        .set_accessed(meta.accessed()?)
        .set_modified(meta.modified()?);
    file.set_times(times)
}

fn io_error(from: &Path, to: &Path, source: io::Error) -> CopyError {
    CopyError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgressSink;

    #[test]
    fn copy_tree_refuses_existing_destination() {
        let temp = tempfile::TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::create_dir(&dst).unwrap();

        let err = copy_tree(&src, &dst).unwrap_err();
        assert!(matches!(err, CopyError::DestinationExists(p) if p == dst));
    }

    #[test]
    fn copy_file_keeps_modification_time() {
        let temp = tempfile::TempDir::new().unwrap();
        let from = temp.path().join("a.bin");
        let to = temp.path().join("b.bin");
        fs::write(&from, b"payload").unwrap();
        let past = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        File::options()
            .write(true)
            .open(&from)
            .unwrap()
            .set_modified(past)
            .unwrap();

        copy_file(&from, &to).unwrap();

        assert_eq!(fs::read(&to).unwrap(), b"payload");
        assert_eq!(fs::metadata(&to).unwrap().modified().unwrap(), past);
    }

    #[test]
    fn copy_entries_counts_files_recursively() {
        let temp = tempfile::TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir_all(src.join("deep/er")).unwrap();
        fs::write(src.join("top.txt"), "1").unwrap();
        fs::write(src.join("deep/mid.txt"), "2").unwrap();
        fs::write(src.join("deep/er/leaf.txt"), "3").unwrap();
        fs::create_dir(&dst).unwrap();

        let files = copy_entries(&src, &dst, Stage::Staging, &NullProgressSink).unwrap();

        assert_eq!(files, 3);
        assert_eq!(fs::read_to_string(dst.join("deep/er/leaf.txt")).unwrap(), "3");
    }
}
