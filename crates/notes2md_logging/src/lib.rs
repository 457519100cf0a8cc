#![deny(missing_docs)]
//! Shared logging utilities for the notes2md workspace.
//!
//! This crate provides the `notes_*` logging macros used across the codebase,
//! the startup logger for the command-line binary and a minimal test
//! initializer for the global logger.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// How much the binary should print while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only warnings and errors. Fatal errors are never hidden.
    Silent,
    /// Stage banners, per-item progress and the run summary.
    #[default]
    Normal,
    /// Everything in `Normal` plus per-file detail.
    Verbose,
}

impl Verbosity {
    /// Picks the verbosity from the command-line flags. `silent` wins over `verbose`.
    pub fn from_flags(silent: bool, verbose: bool) -> Self {
        match (silent, verbose) {
            (true, _) => Verbosity::Silent,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }

    /// The maximum level passed through to the loggers.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Silent => LevelFilter::Warn,
            Verbosity::Normal => LevelFilter::Info,
            Verbosity::Verbose => LevelFilter::Debug,
        }
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! notes_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! notes_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! notes_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! notes_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! notes_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initialize the process logger.
///
/// Always logs to the terminal; errors go to stderr, everything else to stdout.
/// When `log_file` is given, the same records are also written there with
/// timestamps. A log file that cannot be created is reported and skipped.
pub fn initialize(verbosity: Verbosity, log_file: Option<&Path>) {
    let level = verbosity.level_filter();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        terminal_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        if let Some(file_logger) = create_file_logger(level, path) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

/// Only records whose target starts with this prefix are logged.
const WORKSPACE_TARGET_PREFIX: &str = "notes2md";

fn terminal_config() -> Config {
    ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .add_filter_allow_str(WORKSPACE_TARGET_PREFIX)
        .build()
}

fn file_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str(WORKSPACE_TARGET_PREFIX)
        .build()
}

fn create_file_logger(level: LevelFilter, path: &Path) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, file_config(), file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
