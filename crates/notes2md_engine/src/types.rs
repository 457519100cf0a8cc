use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Staging,
    CopyingAttachments,
    CopyingImages,
    Converting,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validating => write!(f, "checking source directory"),
            Stage::Staging => write!(f, "copying source into temporary directory"),
            Stage::CopyingAttachments => write!(f, "copying attachments"),
            Stage::CopyingImages => write!(f, "copying images"),
            Stage::Converting => write!(f, "converting HTML to Markdown"),
            Stage::Cleanup => write!(f, "removing temporary directory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    StageStarted {
        stage: Stage,
        total: Option<usize>,
    },
    /// One item of a bulk stage finished. `index` is 1-based.
    ItemDone {
        stage: Stage,
        index: usize,
        total: usize,
        name: String,
    },
    StageFinished {
        stage: Stage,
    },
}

/// Identifier for one run; names `tmp/<id>` and `out/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Accepts only a single, non-empty path component.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw != "."
            && raw != ".."
            && !raw.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
        valid.then_some(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    SourceMissing(PathBuf),
    MissingSubdirectory { source: PathBuf, name: &'static str },
    SourceContainsRoot { source: PathBuf, root: PathBuf },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::SourceMissing(path) => {
                write!(f, "directory '{}' not found", path.display())
            }
            ValidationIssue::MissingSubdirectory { source, name } => {
                write!(f, "'{name}' directory is missing from {}", source.display())
            }
            ValidationIssue::SourceContainsRoot { source, root } => write!(
                f,
                "source directory {} contains the working root {}",
                source.display(),
                root.display()
            ),
        }
    }
}

/// One HTML file that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub session_id: SessionId,
    pub output_dir: PathBuf,
    /// Set when the temporary directory is still on disk after the run.
    pub retained_tmp_dir: Option<PathBuf>,
    pub converted: usize,
    pub skipped: usize,
    pub assets_copied: usize,
    pub failures: Vec<FileFailure>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
