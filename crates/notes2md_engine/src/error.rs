use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::copy::CopyError;
use crate::decode::DecodeError;
use crate::persist::PersistError;
use crate::ValidationIssue;

pub const EXIT_VALIDATION_FAILURE: u8 = 1;
pub const EXIT_CONVERSION_FAILURE: u8 = 2;

#[derive(Debug, Error)]
#[error("source directory is not usable: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid session id {0:?}: must be a single path component")]
    InvalidSessionId(String),
    #[error("session collision: {} already exists", .0.display())]
    SessionCollision(PathBuf),
    #[error("failed to create {}", .path.display())]
    Prepare { path: PathBuf, source: PersistError },
    #[error("staging the source directory failed")]
    Staging(#[source] CopyError),
    #[error("copying {name} failed")]
    Assets {
        name: &'static str,
        source: CopyError,
    },
    #[error("failed to list {}", .path.display())]
    ListStaged { path: PathBuf, source: io::Error },
}

impl PipelineError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Validation(_) => EXIT_VALIDATION_FAILURE,
            _ => EXIT_CONVERSION_FAILURE,
        }
    }
}

/// Why a single HTML file could not be converted.
#[derive(Debug, Error)]
pub enum ConvertFileError {
    #[error("failed to read {}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to decode {}", .path.display())]
    Decode { path: PathBuf, source: DecodeError },
    #[error("failed to write {}", .path.display())]
    Write { path: PathBuf, source: PersistError },
}

/// `err` followed by each of its sources, separated by `: `.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
