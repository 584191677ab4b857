//! End-to-end daily run
//!
//! Prepares the workspace, resolves and downloads the day's archives,
//! extracts every XML file in parallel and publishes the consolidated
//! dataset.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::batch::{BatchCoordinator, CancellationToken, FileDiagnostic};
use crate::config::PipelineConfig;
use crate::document::XmlFileLoader;
use crate::error::Result;
use crate::extract::RecordExtractor;
use crate::feed::load_feed_index;
use crate::sink::{DatasetSink, LocalDirectoryStorage, PublishedArtifact, StorageClient};
use crate::transport::{ArchiveFetcher, DEFAULT_TIMEOUT, SchemeFetcher, download_and_unzip};
use crate::utils::logging::{create_spinner, finish_and_clear};
use crate::workspace::Workspace;

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Artifact written to storage
    pub artifact: PublishedArtifact,
    /// Where the artifact was archived, if it was
    pub archived: Option<PathBuf>,
    /// Number of XML files processed
    pub files: usize,
    /// Files that failed or yielded no records
    pub diagnostics: Vec<FileDiagnostic>,
}

/// The daily extraction job
pub struct Pipeline<F, S> {
    config: PipelineConfig,
    fetcher: F,
    storage: S,
    cancellation: CancellationToken,
}

impl Pipeline<SchemeFetcher, LocalDirectoryStorage> {
    /// Pipeline that downloads over HTTP(S) or from local paths and
    /// publishes into the workspace's `out/` directory
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let fetcher = SchemeFetcher::new(DEFAULT_TIMEOUT)?;
        let storage = LocalDirectoryStorage::new(config.out_dir());
        Ok(Self::with_parts(config, fetcher, storage))
    }
}

impl<F: ArchiveFetcher, S: StorageClient> Pipeline<F, S> {
    #[must_use]
    pub fn with_parts(config: PipelineConfig, fetcher: F, storage: S) -> Self {
        Self {
            config,
            fetcher,
            storage,
            cancellation: CancellationToken::new(),
        }
    }

    /// Token that cancels the extraction stage of a running pipeline
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Run the whole job once
    ///
    /// # Errors
    /// Fails with the first terminal error of any stage; nothing is
    /// published unless extraction produced at least one record.
    pub fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let workspace = Workspace::new(&self.config);
        workspace.prepare()?;

        if self.config.download {
            workspace.clear_old_files()?;
            self.fetch_archives(&workspace)?;
        }

        let files = workspace.xml_files()?;
        let coordinator = BatchCoordinator::new(
            XmlFileLoader::new(),
            RecordExtractor::new(self.config.schema.clone()),
            self.config.batch.clone(),
        )
        .with_cancellation(self.cancellation.clone());
        let output = coordinator.run(&files)?;

        let sink = DatasetSink::new(&self.storage).with_prefix(self.config.artifact_prefix.clone());
        let artifact = sink.publish(&output.dataset)?;

        let published = Path::new(&artifact.location);
        let archived = if self.config.archive_published && published.is_file() {
            Some(workspace.archive(published)?)
        } else {
            None
        };

        log::info!(
            "Process completed successfully: {} rows from {} files in {:?}",
            artifact.rows,
            output.files_processed,
            start.elapsed()
        );
        Ok(RunReport {
            artifact,
            archived,
            files: output.files_processed,
            diagnostics: output.diagnostics,
        })
    }

    fn fetch_archives(&self, workspace: &Workspace) -> Result<()> {
        let links = load_feed_index(&XmlFileLoader::new(), &self.config.index_file)?;
        let spinner = create_spinner(Some("Downloading archives"));
        let result = download_and_unzip(&links, &self.fetcher, workspace.downloads_dir());
        finish_and_clear(&spinner);
        result?;
        Ok(())
    }
}
