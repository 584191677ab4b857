//! Per-file results and batch output types

use std::fmt;
use std::path::PathBuf;

use crate::error::FileError;
use crate::models::{ConsolidatedDataset, InstrumentRecord};

/// Result of processing one file
#[derive(Debug)]
pub enum ExtractionResult {
    /// At least one record was extracted
    Records(Vec<InstrumentRecord>),
    /// The file matched the schema but held no records
    Empty,
    /// The file could not be loaded or extracted
    Failed(FileError),
}

impl ExtractionResult {
    /// Classify an extracted record list
    #[must_use]
    pub fn from_records(records: Vec<InstrumentRecord>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Records(records)
        }
    }
}

/// Why a file contributed nothing to the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticReason {
    /// Processing failed; `kind` names the error kind
    Failed { kind: &'static str, message: String },
    /// The file was processed but yielded zero records
    NoRecords,
}

impl From<&FileError> for DiagnosticReason {
    fn from(err: &FileError) -> Self {
        Self::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { kind, message } => write!(f, "{kind}: {message}"),
            Self::NoRecords => f.write_str("zero records"),
        }
    }
}

/// A file that failed or yielded no records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiagnostic {
    pub file: PathBuf,
    pub reason: DiagnosticReason,
}

impl fmt::Display for FileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.file.display(), self.reason)
    }
}

/// Output of a successful batch run
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Records of every successful file, in input order
    pub dataset: ConsolidatedDataset,
    /// Files that failed or yielded no records, in input order
    pub diagnostics: Vec<FileDiagnostic>,
    /// Number of files in the batch
    pub files_processed: usize,
}

impl BatchOutput {
    /// Diagnostics for files that failed
    pub fn failures(&self) -> impl Iterator<Item = &FileDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.reason, DiagnosticReason::Failed { .. }))
    }

    /// Diagnostics for files that yielded no records
    pub fn empty_files(&self) -> impl Iterator<Item = &FileDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.reason == DiagnosticReason::NoRecords)
    }
}
