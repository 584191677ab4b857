//! Error handling for the reference-data pipeline.
//!
//! Errors are layered: per-file errors ([`LoadError`], [`ExtractionError`],
//! folded into [`FileError`]) are reported as data by the batch coordinator,
//! while batch-, publish- and pipeline-level errors are terminal for a run.

use std::io;
use std::path::PathBuf;

/// Errors raised while turning a file into a [`RawDocument`](crate::document::RawDocument)
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not well-formed XML
    #[error("malformed XML in {}: {detail}", path.display())]
    Xml { path: PathBuf, detail: String },
}

/// Errors raised while projecting a document onto instrument records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// A segment of the fixed navigation path is absent or not a mapping
    #[error("schema mismatch in {}: path segment '{segment}' not found", file.display())]
    SchemaMismatch { file: PathBuf, segment: String },

    /// A record had an unexpected shape
    #[error("malformed record in {}: {detail}", file.display())]
    Malformed { file: PathBuf, detail: String },
}

/// Why a single file of a batch produced no usable records
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The worker processing the file panicked
    #[error("worker panicked while processing {}: {detail}", file.display())]
    Panicked { file: PathBuf, detail: String },
}

impl FileError {
    /// Short, stable name of the error kind, used in diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load(_) => "LoadError",
            Self::Extraction(ExtractionError::SchemaMismatch { .. }) => "SchemaMismatch",
            Self::Extraction(ExtractionError::Malformed { .. }) => "Malformed",
            Self::Panicked { .. } => "Panicked",
        }
    }
}

/// Batch-level errors: no usable work was produced
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("no input files were supplied")]
    EmptyInput,

    #[error("all {failed} input files failed to process")]
    AllFailed { failed: usize },

    #[error("batch was cancelled after {completed} of {total} files")]
    Cancelled { completed: usize, total: usize },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

/// Errors reported by a storage collaborator
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage rejected artifact '{name}': {detail}")]
    Rejected { name: String, detail: String },
}

/// Publish-level errors
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// An empty dataset is never a publishable artifact
    #[error("refusing to publish an empty dataset")]
    EmptyDataset,

    #[error("failed to write artifact '{artifact}': {detail}")]
    WriteFailed { artifact: String, detail: String },
}

/// Errors raised while parsing the feed index
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("unexpected feed index structure: {0}")]
    Structure(String),
}

/// Errors raised while downloading and unpacking archives
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("nothing to download")]
    NothingToDownload,

    #[error("request for {link} failed: {detail}")]
    Request { link: String, detail: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid zip archive: {0}")]
    Archive(String),

    #[error("failed to download or unzip {} of the requested files", failed.len())]
    Incomplete { failed: Vec<String> },
}

/// Errors raised while preparing or cleaning the working directories
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while building configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read schema file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid schema definition: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Terminal errors of a full pipeline run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
