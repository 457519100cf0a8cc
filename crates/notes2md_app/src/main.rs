//! notes2md binary: argument parsing, logger setup and exit codes.
mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use notes2md_engine::{
    run_pipeline, LogProgressSink, NullProgressSink, PipelineConfig, PipelineError, ProgressSink,
    RunSummary, EXIT_CONVERSION_FAILURE,
};
use notes2md_logging::{notes_error, notes_info, notes_warn, Verbosity};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.silent, cli.verbose);
    notes2md_logging::initialize(verbosity, cli.log_file.as_deref());

    match run(&cli, verbosity) {
        Ok(summary) => report(&summary),
        Err(err) => {
            notes_error!("{:#}", err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: &Cli, verbosity: Verbosity) -> Result<RunSummary> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => cli::install_root().context("resolving the install location")?,
    };
    let mut config = PipelineConfig::new(root, &cli.src_dir);
    config.keep_tmp = cli.keep_tmp;

    let sink: Box<dyn ProgressSink> = match verbosity {
        Verbosity::Silent => Box::new(NullProgressSink),
        Verbosity::Normal | Verbosity::Verbose => Box::new(LogProgressSink),
    };
    let summary = run_pipeline(&config, sink.as_ref())
        .with_context(|| format!("converting {}", config.resolved_source().display()))?;
    Ok(summary)
}

fn report(summary: &RunSummary) -> ExitCode {
    notes_info!(
        "Converted {} file(s), skipped {} other entry(ies), copied {} asset file(s)",
        summary.converted,
        summary.skipped,
        summary.assets_copied
    );
    notes_info!("Output written to {}", summary.output_dir.display());
    if let Some(tmp) = &summary.retained_tmp_dir {
        notes_info!("Temporary files kept in {}", tmp.display());
    }

    if summary.is_clean() {
        return ExitCode::SUCCESS;
    }
    notes_warn!("{} file(s) could not be converted:", summary.failures.len());
    for failure in &summary.failures {
        notes_warn!("  {}: {}", failure.file.display(), failure.reason);
    }
    ExitCode::from(EXIT_CONVERSION_FAILURE)
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PipelineError>()
        .map_or(EXIT_CONVERSION_FAILURE, PipelineError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes2md_engine::{
        FileFailure, SessionId, ValidationError, ValidationIssue, EXIT_VALIDATION_FAILURE,
    };
    use std::path::PathBuf;

    fn summary() -> RunSummary {
        RunSummary {
            session_id: SessionId::parse("s1").unwrap(),
            output_dir: PathBuf::from("out/s1"),
            retained_tmp_dir: None,
            converted: 1,
            skipped: 0,
            assets_copied: 0,
            failures: Vec::new(),
        }
    }

    #[test]
    fn leftover_tmp_dir_still_succeeds() {
        let summary = RunSummary {
            retained_tmp_dir: Some(PathBuf::from("tmp/s1")),
            ..summary()
        };
        assert_eq!(report(&summary), ExitCode::SUCCESS);
    }

    #[test]
    fn failed_files_exit_with_two() {
        let summary = RunSummary {
            failures: vec![FileFailure {
                file: PathBuf::from("notes/bad.html"),
                reason: "failed to decode".into(),
            }],
            ..summary()
        };
        assert_eq!(report(&summary), ExitCode::from(EXIT_CONVERSION_FAILURE));
    }

    #[test]
    fn validation_errors_exit_with_one() {
        let err = PipelineError::from(ValidationError {
            issues: vec![ValidationIssue::SourceMissing(PathBuf::from("notes"))],
        });
        let err = anyhow::Error::new(err).context("converting notes");
        assert_eq!(exit_code_for(&err), EXIT_VALIDATION_FAILURE);
    }

    #[test]
    fn pipeline_failures_exit_with_two() {
        let err = anyhow::Error::new(PipelineError::SessionCollision(PathBuf::from("out/x")))
            .context("converting notes");
        assert_eq!(exit_code_for(&err), EXIT_CONVERSION_FAILURE);
    }

    #[test]
    fn unrelated_errors_exit_with_two() {
        let err = anyhow::anyhow!("no executable path");
        assert_eq!(exit_code_for(&err), EXIT_CONVERSION_FAILURE);
    }
}
