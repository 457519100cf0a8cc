//! notes2md engine: validate an HTML export, stage it and convert it to Markdown.
mod config;
mod convert;
mod copy;
mod decode;
mod error;
mod extract;
mod filename;
mod persist;
mod pipeline;
mod progress;
mod types;
mod validate;

pub use config::{
    local_timestamp, PipelineConfig, SessionClock, SessionLayout, ATTACHMENTS_DIR, IMAGES_DIR,
    OUT_DIR_NAME, TMP_DIR_NAME,
};
pub use convert::{atx_headings, Converter, Html2MdConverter};
pub use copy::{copy_entries, copy_file, copy_tree, CopyError};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use error::{
    error_chain, ConvertFileError, PipelineError, ValidationError, EXIT_CONVERSION_FAILURE,
    EXIT_VALIDATION_FAILURE,
};
pub use extract::{BodyExtractor, Extractor};
pub use filename::{is_html_name, markdown_filename};
pub use persist::{create_fresh_dir, ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{run_pipeline, Pipeline};
pub use progress::{LogProgressSink, NullProgressSink, ProgressSink, RecordingProgressSink};
pub use types::{FileFailure, ProgressEvent, RunSummary, SessionId, Stage, ValidationIssue};
pub use validate::validate_source;
