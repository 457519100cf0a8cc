//! The four-stage conversion run: validate, stage, convert, clean up.

use std::fs;
use std::path::{Path, PathBuf};

use notes2md_logging::{notes_debug, notes_error, notes_info, notes_warn};

use crate::config::{PipelineConfig, SessionLayout, ATTACHMENTS_DIR, IMAGES_DIR};
use crate::convert::{Converter, Html2MdConverter};
use crate::copy::{copy_entries, sorted_entries};
use crate::decode::decode_html;
use crate::error::{error_chain, ConvertFileError, PipelineError};
use crate::extract::{BodyExtractor, Extractor};
use crate::filename::{is_html_name, markdown_filename};
use crate::persist::{create_fresh_dir, ensure_output_dir, AtomicFileWriter, PersistError};
use crate::progress::ProgressSink;
use crate::validate::validate_source;
use crate::{FileFailure, ProgressEvent, RunSummary, SessionId, Stage};

/// Run with the default extractor and converter.
pub fn run_pipeline(
    config: &PipelineConfig,
    sink: &dyn ProgressSink,
) -> Result<RunSummary, PipelineError> {
    Pipeline::default().run(config, sink)
}

pub struct Pipeline {
    extractor: Box<dyn Extractor>,
    converter: Box<dyn Converter>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Box::new(BodyExtractor), Box::new(Html2MdConverter))
    }
}

struct ConversionReport {
    converted: usize,
    skipped: usize,
    failures: Vec<FileFailure>,
}

impl Pipeline {
    pub fn new(extractor: Box<dyn Extractor>, converter: Box<dyn Converter>) -> Self {
        Self {
            extractor,
            converter,
        }
    }

    pub fn run(
        &self,
        config: &PipelineConfig,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary, PipelineError> {
        let source = config.resolved_source();

        sink.emit(ProgressEvent::StageStarted {
            stage: Stage::Validating,
            total: None,
        });
        validate_source(&source, &config.root_dir)?;
        sink.emit(ProgressEvent::StageFinished {
            stage: Stage::Validating,
        });

        let raw_id = (config.session_clock)();
        let session_id =
            SessionId::parse(raw_id.as_str()).ok_or(PipelineError::InvalidSessionId(raw_id))?;
        let layout = SessionLayout::new(&config.root_dir, source, session_id);
        notes_info!("Session {}", layout.session_id);
        notes_debug!(
            "source={:?} tmp={:?} out={:?}",
            layout.source_dir,
            layout.tmp_dir,
            layout.out_dir
        );

        prepare_session_dirs(&layout)?;
        copy_entries(&layout.source_dir, &layout.tmp_dir, Stage::Staging, sink)
            .map_err(PipelineError::Staging)?;

        let assets_copied = copy_assets(&layout, sink)?;
        let report = self.convert_all(&layout, sink)?;
        let retained_tmp_dir = cleanup(&layout, config.keep_tmp, sink);

        Ok(RunSummary {
            session_id: layout.session_id,
            output_dir: layout.out_dir,
            retained_tmp_dir,
            converted: report.converted,
            skipped: report.skipped,
            assets_copied,
            failures: report.failures,
        })
    }

    fn convert_all(
        &self,
        layout: &SessionLayout,
        sink: &dyn ProgressSink,
    ) -> Result<ConversionReport, PipelineError> {
        let entries =
            sorted_entries(&layout.tmp_dir).map_err(|source| PipelineError::ListStaged {
                path: layout.tmp_dir.clone(),
                source,
            })?;
        let (html_files, others): (Vec<PathBuf>, Vec<PathBuf>) =
            entries.into_iter().partition(|path| is_html_name(path));
        let skipped = others
            .iter()
            .filter(|path| !is_asset_dir(path))
            .inspect(|path| notes_debug!("Skipping {:?}", path))
            .count();

        let total = html_files.len();
        sink.emit(ProgressEvent::StageStarted {
            stage: Stage::Converting,
            total: Some(total),
        });

        ensure_output_dir(&layout.out_dir).map_err(|source| PipelineError::Prepare {
            path: layout.out_dir.clone(),
            source,
        })?;
        let writer = AtomicFileWriter::new(layout.out_dir.clone());
        let mut converted = 0;
        let mut failures = Vec::new();
        for (i, html_path) in html_files.iter().enumerate() {
            let name = html_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match self.convert_file(html_path, &name, &writer) {
                Ok(target) => {
                    notes_debug!("Wrote {:?}", target);
                    converted += 1;
                }
                Err(err) => {
                    let reason = error_chain(&err);
                    notes_error!("Skipping {}: {}", name, reason);
                    failures.push(FileFailure {
                        file: layout.source_dir.join(html_path.file_name().unwrap_or_default()),
                        reason,
                    });
                }
            }
            sink.emit(ProgressEvent::ItemDone {
                stage: Stage::Converting,
                index: i + 1,
                total,
                name,
            });
        }

        sink.emit(ProgressEvent::StageFinished {
            stage: Stage::Converting,
        });
        Ok(ConversionReport {
            converted,
            skipped,
            failures,
        })
    }

    fn convert_file(
        &self,
        html_path: &Path,
        name: &str,
        writer: &AtomicFileWriter,
    ) -> Result<PathBuf, ConvertFileError> {
        let bytes = fs::read(html_path).map_err(|source| ConvertFileError::Read {
            path: html_path.to_path_buf(),
            source,
        })?;
        let decoded = decode_html(&bytes).map_err(|source| ConvertFileError::Decode {
            path: html_path.to_path_buf(),
            source,
        })?;
        notes_debug!(
            "{}: {} bytes, encoding {}",
            name,
            bytes.len(),
            decoded.encoding_label
        );

        let body = self.extractor.extract(&decoded.html);
        let markdown = self.converter.to_markdown(&body);

        // `name` always ends in `.html` here.
        let md_name = markdown_filename(name).unwrap_or_else(|| format!("{name}.md"));
        writer
            .write(&md_name, &markdown)
            .map_err(|source| ConvertFileError::Write {
                path: writer.dir().join(&md_name),
                source,
            })
    }
}

/// Creates `tmp/<id>` and `out/<id>`; either already existing is a session collision.
fn prepare_session_dirs(layout: &SessionLayout) -> Result<(), PipelineError> {
    for dir in [&layout.tmp_dir, &layout.out_dir] {
        if dir.exists() {
            return Err(PipelineError::SessionCollision(dir.clone()));
        }
    }
    for dir in [&layout.tmp_dir, &layout.out_dir] {
        create_fresh_dir(dir).map_err(|err| match err {
            PersistError::AlreadyExists(path) => PipelineError::SessionCollision(path),
            source => PipelineError::Prepare {
                path: dir.clone(),
                source,
            },
        })?;
    }
    Ok(())
}

fn copy_assets(layout: &SessionLayout, sink: &dyn ProgressSink) -> Result<usize, PipelineError> {
    let mut copied = 0;
    for (name, stage) in [
        (ATTACHMENTS_DIR, Stage::CopyingAttachments),
        (IMAGES_DIR, Stage::CopyingImages),
    ] {
        let dst = layout.out_dir.join(name);
        create_fresh_dir(&dst).map_err(|source| PipelineError::Prepare {
            path: dst.clone(),
            source,
        })?;
        copied += copy_entries(&layout.tmp_dir.join(name), &dst, stage, sink)
            .map_err(|source| PipelineError::Assets { name, source })?;
    }
    Ok(copied)
}

/// Returns the temporary directory if it is still on disk afterwards.
fn cleanup(layout: &SessionLayout, keep_tmp: bool, sink: &dyn ProgressSink) -> Option<PathBuf> {
    if keep_tmp {
        notes_info!("Keeping temporary directory {:?}", layout.tmp_dir);
        return Some(layout.tmp_dir.clone());
    }

    sink.emit(ProgressEvent::StageStarted {
        stage: Stage::Cleanup,
        total: None,
    });
    match fs::remove_dir_all(&layout.tmp_dir) {
        Ok(()) => {
            sink.emit(ProgressEvent::StageFinished {
                stage: Stage::Cleanup,
            });
            None
        }
        Err(err) => {
            notes_warn!(
                "Could not remove temporary directory {:?}: {}",
                layout.tmp_dir,
                err
            );
            Some(layout.tmp_dir.clone())
        }
    }
}

fn is_asset_dir(path: &Path) -> bool {
    path.is_dir()
        && path
            .file_name()
            .is_some_and(|name| name == ATTACHMENTS_DIR || name == IMAGES_DIR)
}
