//! Dataset publishing
//!
//! Serializes a [`ConsolidatedDataset`] to CSV and hands it to a
//! [`StorageClient`]. Rows keep dataset order; the header row lists the six
//! record columns in their fixed order.

pub mod storage;

use chrono::{Local, NaiveDate};

use crate::error::SinkError;
use crate::models::ConsolidatedDataset;

pub use storage::{InMemoryStorage, LocalDirectoryStorage, StorageClient};

/// Extension of published artifacts
pub const ARTIFACT_EXTENSION: &str = "csv";

/// An artifact written by [`DatasetSink::publish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
    /// Artifact name within the storage
    pub name: String,
    /// Storage-specific location of the artifact
    pub location: String,
    /// Number of data rows written
    pub rows: usize,
}

/// Validates and publishes consolidated datasets
pub struct DatasetSink<S> {
    storage: S,
    prefix: String,
}

impl<S: StorageClient> DatasetSink<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to artifact names
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Publish `dataset` under today's dated artifact name
    pub fn publish(&self, dataset: &ConsolidatedDataset) -> Result<PublishedArtifact, SinkError> {
        let name = artifact_name(&self.prefix, Local::now().date_naive());
        self.publish_as(dataset, &name)
    }

    /// Publish `dataset` as artifact `name`
    ///
    /// # Errors
    /// - [`SinkError::EmptyDataset`] if the dataset has no rows; storage is
    ///   not touched
    /// - [`SinkError::WriteFailed`] if serialization or the write fails, or
    ///   the artifact is absent afterwards
    pub fn publish_as(
        &self,
        dataset: &ConsolidatedDataset,
        name: &str,
    ) -> Result<PublishedArtifact, SinkError> {
        if dataset.is_empty() {
            return Err(SinkError::EmptyDataset);
        }

        let write_failed = |detail: String| SinkError::WriteFailed {
            artifact: name.to_string(),
            detail,
        };

        log::info!("Creating CSV artifact {name} with {} rows", dataset.len());
        let bytes = serialize_csv(dataset).map_err(|e| write_failed(e.to_string()))?;

        self.storage
            .put(name, &bytes)
            .map_err(|e| write_failed(e.to_string()))?;

        if !self.storage.exists(name) {
            log::error!("{name} is not present after writing");
            return Err(write_failed("artifact not found after write".to_string()));
        }

        let location = self.storage.location(name);
        log::info!("Successfully created {location}");
        Ok(PublishedArtifact {
            name: name.to_string(),
            location,
            rows: dataset.len(),
        })
    }
}

/// Dated artifact name: `<prefix><YYYYMMDD>.csv`
#[must_use]
pub fn artifact_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}{}.{ARTIFACT_EXTENSION}", date.format("%Y%m%d"))
}

/// Serialize `dataset` to CSV with a header row
pub fn serialize_csv(dataset: &ConsolidatedDataset) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in dataset {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
