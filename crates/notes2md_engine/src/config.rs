use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;

use crate::SessionId;

pub const TMP_DIR_NAME: &str = "tmp";
pub const OUT_DIR_NAME: &str = "out";
pub const ATTACHMENTS_DIR: &str = "attachments";
pub const IMAGES_DIR: &str = "images";

pub type SessionClock = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct PipelineConfig {
    /// Install root; `tmp/` and `out/` live here and relative sources resolve against it.
    pub root_dir: PathBuf,
    pub source_dir: PathBuf,
    pub keep_tmp: bool,
    pub session_clock: SessionClock,
}

impl PipelineConfig {
    pub fn new(root_dir: impl Into<PathBuf>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            source_dir: source_dir.into(),
            keep_tmp: false,
            session_clock: Arc::new(local_timestamp),
        }
    }

    pub fn resolved_source(&self) -> PathBuf {
        // `join` keeps absolute sources untouched.
        self.root_dir.join(&self.source_dir)
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("root_dir", &self.root_dir)
            .field("source_dir", &self.source_dir)
            .field("keep_tmp", &self.keep_tmp)
            .finish_non_exhaustive()
    }
}

/// Local wall-clock time with microseconds, safe to use as a directory name.
pub fn local_timestamp() -> String {
    Local::now().format("%Y-%m-%d_%H-%M-%S%.6f").to_string()
}

/// Where one session reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLayout {
    pub session_id: SessionId,
    pub source_dir: PathBuf,
    pub tmp_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl SessionLayout {
    pub fn new(root: &Path, source_dir: PathBuf, session_id: SessionId) -> Self {
        let tmp_dir = root.join(TMP_DIR_NAME).join(session_id.as_str());
        let out_dir = root.join(OUT_DIR_NAME).join(session_id.as_str());
        Self {
            session_id,
            source_dir,
            tmp_dir,
            out_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_source_resolves_against_root() {
        let config = PipelineConfig::new("/opt/notes2md", "notes");
        assert_eq!(config.resolved_source(), PathBuf::from("/opt/notes2md/notes"));
    }

    #[cfg(unix)]
    #[test]
    fn absolute_source_is_kept() {
        let config = PipelineConfig::new("/opt/notes2md", "/data/export");
        assert_eq!(config.resolved_source(), PathBuf::from("/data/export"));
    }

    #[test]
    fn default_timestamp_is_a_valid_session_id() {
        let stamp = local_timestamp();
        assert!(SessionId::parse(stamp.clone()).is_some(), "{stamp}");
        assert!(!stamp.contains(':'));
        assert!(!stamp.contains(' '));
    }

    #[test]
    fn layout_namespaces_tmp_and_out_by_session() {
        let id = SessionId::parse("s1").unwrap();
        let layout = SessionLayout::new(Path::new("/root"), PathBuf::from("/src"), id);
        assert_eq!(layout.tmp_dir, PathBuf::from("/root/tmp/s1"));
        assert_eq!(layout.out_dir, PathBuf::from("/root/out/s1"));
    }
}
