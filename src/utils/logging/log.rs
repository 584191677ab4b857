//! Logging helpers for the extraction run
//!
//! Keeps the wording of the recurring run messages in one place.

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

/// Log the start of a scan for input files in `dir`
pub fn log_scan_start(dir: &Path) {
    log::info!("Searching for XML files in {}", dir.display());
}

/// Log the outcome of an input file scan; finding nothing is a warning
pub fn log_files_found(dir: &Path, count: usize) {
    if count == 0 {
        log::warn!("No XML files found in {}", dir.display());
    } else {
        log::info!("Found {count} XML files in {}", dir.display());
    }
}

/// Log the dispatch of a batch
pub fn log_batch_start(files: usize, workers: usize) {
    log::info!("Processing {files} files with {workers} workers");
}

/// Log the result of a finished batch
pub fn log_batch_complete(records: usize, files: usize, elapsed: Duration) {
    log::info!("Extracted {records} records from {files} files in {elapsed:?}");
}

/// Warn about files that contributed nothing to a batch, one line each
///
/// # Arguments
/// * `skipped` - Per-file diagnostics, in input order
/// * `total` - Number of files in the batch
pub fn log_skipped_files<D: Display>(skipped: &[D], total: usize) {
    let Some(summary) = skipped_summary(skipped.len(), total) else {
        return;
    };
    log::warn!("{summary}");
    for diagnostic in skipped {
        log::warn!("Skipped {diagnostic}");
    }
}

fn skipped_summary(skipped: usize, total: usize) -> Option<String> {
    (skipped > 0).then(|| format!("{skipped} of {total} files were skipped"))
}
