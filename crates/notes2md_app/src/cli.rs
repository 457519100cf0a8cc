use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;

/// Convert an HTML notes export into Markdown.
///
/// Results land in `<root>/out/<session>/`; the staging copy in `<root>/tmp/<session>/`.
#[derive(Parser, Debug)]
#[command(name = "notes2md", version)]
pub struct Cli {
    /// Export directory holding the HTML files plus `attachments/` and `images/`.
    /// Relative paths are resolved against the install root.
    pub src_dir: PathBuf,

    /// Only print warnings and errors.
    #[arg(long)]
    pub silent: bool,

    /// Keep the temporary staging copy after the run.
    #[arg(long)]
    pub keep_tmp: bool,

    /// Also log per-file detail such as detected encodings.
    #[arg(long)]
    pub verbose: bool,

    /// Install root; defaults to the directory holding the executable.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Also write the log to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Directory containing the running executable, with symlinks resolved.
pub fn install_root() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "executable path has no parent directory",
        )
    })
}
