//! Batch coordination
//!
//! Runs record extraction over a set of files on a bounded worker pool and
//! merges the per-file results into one [`ConsolidatedDataset`].
//!
//! Every file yields exactly one [`ExtractionResult`]. Failures stay inside
//! the task that produced them and surface as [`FileDiagnostic`]s; only
//! batch-level conditions ([`BatchError`]) fail a run.

pub mod cancel;
pub mod outcome;

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::ProgressBar;
use itertools::Itertools;
use rayon::prelude::*;

use crate::config::BatchConfig;
use crate::document::DocumentLoader;
use crate::error::{BatchError, FileError};
use crate::extract::RecordExtractor;
use crate::models::ConsolidatedDataset;
use crate::utils::logging::{
    create_main_progress_bar, finish_and_clear, finish_progress_bar, hidden_progress_bar,
    log_batch_complete, log_batch_start, log_skipped_files,
};

pub use cancel::CancellationToken;
pub use outcome::{BatchOutput, DiagnosticReason, ExtractionResult, FileDiagnostic};

/// Coordinates extraction of a batch of files
pub struct BatchCoordinator<L> {
    loader: L,
    extractor: RecordExtractor,
    config: BatchConfig,
    cancellation: CancellationToken,
}

impl<L: DocumentLoader> BatchCoordinator<L> {
    #[must_use]
    pub fn new(loader: L, extractor: RecordExtractor, config: BatchConfig) -> Self {
        Self {
            loader,
            extractor,
            config,
            cancellation: CancellationToken::new(),
        }
    }

    /// Use `token` to cancel runs of this coordinator
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Process every file in `files` and merge the results in input order
    ///
    /// # Errors
    /// - [`BatchError::EmptyInput`] if `files` is empty
    /// - [`BatchError::AllFailed`] if no file could be processed
    /// - [`BatchError::Cancelled`] if the batch was cancelled
    /// - [`BatchError::WorkerPool`] if the worker pool cannot be created
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchOutput, BatchError> {
        if files.is_empty() {
            return Err(BatchError::EmptyInput);
        }

        let start = Instant::now();
        let workers = self.config.effective_workers();
        log_batch_start(files.len(), workers);

        let pb = if self.config.show_progress {
            create_main_progress_bar(files.len() as u64, Some("Extracting instruments"))
        } else {
            hidden_progress_bar(files.len() as u64)
        };

        let slots = self.dispatch(files, workers, &pb)?;

        if self.cancellation.is_cancelled() {
            finish_and_clear(&pb);
            let completed = slots.iter().flatten().count();
            log::warn!(
                "Batch cancelled after {completed} of {} files, discarding results",
                files.len()
            );
            return Err(BatchError::Cancelled {
                completed,
                total: files.len(),
            });
        }
        finish_progress_bar(&pb, Some("Extraction complete"));

        let results = files
            .iter()
            .cloned()
            .zip(slots.into_iter().flatten())
            .collect_vec();
        let output = merge(results)?;

        log_skipped_files(&output.diagnostics, files.len());
        log_batch_complete(output.dataset.len(), output.files_processed, start.elapsed());
        Ok(output)
    }

    /// Run one task per file on a pool built for this batch.
    ///
    /// The returned vector has one slot per input file, at the file's index;
    /// a slot is `None` only when cancellation stopped the task from starting.
    fn dispatch(
        &self,
        files: &[PathBuf],
        workers: usize,
        pb: &ProgressBar,
    ) -> Result<Vec<Option<ExtractionResult>>, BatchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("firds-worker-{i}"))
            .build()
            .map_err(|e| BatchError::WorkerPool(e.to_string()))?;

        let slots = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    if self.cancellation.is_cancelled() {
                        return None;
                    }
                    let result = self.process_file(file);
                    pb.inc(1);
                    Some(result)
                })
                .collect::<Vec<_>>()
        });

        // All tasks have drained once `install` returns.
        drop(pool);
        Ok(slots)
    }

    /// Load and extract a single file, capturing any failure as data
    fn process_file(&self, file: &Path) -> ExtractionResult {
        log::info!("Processing {}", file.display());

        let attempt = catch_unwind(AssertUnwindSafe(|| -> Result<_, FileError> {
            let doc = self.loader.load(file)?;
            Ok(self.extractor.extract(&doc)?)
        }));

        let result = match attempt {
            Ok(Ok(records)) => ExtractionResult::from_records(records),
            Ok(Err(err)) => ExtractionResult::Failed(err),
            Err(payload) => ExtractionResult::Failed(FileError::Panicked {
                file: file.to_path_buf(),
                detail: panic_message(payload.as_ref()),
            }),
        };

        match &result {
            ExtractionResult::Failed(err) => {
                log::error!("Error processing {}: {err}", file.display());
            }
            ExtractionResult::Empty => {
                log::warn!("No instrument records found in {}", file.display());
            }
            ExtractionResult::Records(records) => {
                log::debug!("{} records from {}", records.len(), file.display());
            }
        }
        result
    }
}

/// Merge per-file results, given in input order, into a batch output
///
/// # Errors
/// Returns [`BatchError::EmptyInput`] for no results and
/// [`BatchError::AllFailed`] when every result is a failure.
pub fn merge(results: Vec<(PathBuf, ExtractionResult)>) -> Result<BatchOutput, BatchError> {
    if results.is_empty() {
        return Err(BatchError::EmptyInput);
    }

    let files_processed = results.len();
    let mut records = Vec::new();
    let mut diagnostics = Vec::new();
    let mut failed = 0;

    for (file, result) in results {
        match result {
            ExtractionResult::Records(file_records) => records.extend(file_records),
            ExtractionResult::Empty => diagnostics.push(FileDiagnostic {
                file,
                reason: DiagnosticReason::NoRecords,
            }),
            ExtractionResult::Failed(err) => {
                failed += 1;
                diagnostics.push(FileDiagnostic {
                    file,
                    reason: DiagnosticReason::from(&err),
                });
            }
        }
    }

    if failed == files_processed {
        return Err(BatchError::AllFailed { failed });
    }

    Ok(BatchOutput {
        dataset: ConsolidatedDataset::new(records),
        diagnostics,
        files_processed,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
