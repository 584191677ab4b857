//! Domain models for instrument reference data
//!
//! This module contains the flat record produced for each instrument and the
//! consolidated dataset assembled from a batch of files.

pub mod dataset;
pub mod instrument;

// Re-export commonly used types
pub use dataset::ConsolidatedDataset;
pub use instrument::{InstrumentField, InstrumentRecord};
