//! Logging utilities for output and progress tracking
//!
//! Run messages and progress bars for the extraction batch and the
//! archive download.

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use log::{
    log_batch_complete, log_batch_start, log_files_found, log_scan_start, log_skipped_files,
};
pub use progress::{
    create_main_progress_bar, create_spinner, finish_and_clear, finish_progress_bar,
    hidden_progress_bar,
};
