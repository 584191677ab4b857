//! A Rust library for extracting instrument reference data from FIRDS XML
//! publications, processing files in parallel with per-file isolation.

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod feed;
pub mod models;
pub mod pipeline;
pub mod sink;
pub mod transport;
pub mod utils;
pub mod workspace;

// Re-export the most common types for easier use
// Core types
pub use config::{BatchConfig, ExtractionSchema, PipelineConfig};
pub use error::{
    BatchError, ExtractionError, FileError, LoadError, PipelineError, Result, SinkError,
};
pub use models::{ConsolidatedDataset, InstrumentField, InstrumentRecord};

// Pipeline stages
pub use batch::{BatchCoordinator, BatchOutput, CancellationToken, ExtractionResult, FileDiagnostic};
pub use document::{DocumentLoader, Node, RawDocument, XmlFileLoader};
pub use extract::RecordExtractor;
pub use pipeline::{Pipeline, RunReport};
pub use sink::{DatasetSink, InMemoryStorage, LocalDirectoryStorage, StorageClient};
