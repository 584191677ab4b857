//! Configuration for the reference-data pipeline.

pub mod schema;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub use schema::{AttributeMapping, ExtractionSchema};

/// Environment variable overriding [`PipelineConfig::home_dir`]
pub const ENV_HOME: &str = "FIRDS_HOME";
/// Environment variable overriding [`PipelineConfig::index_file`]
pub const ENV_INDEX_FILE: &str = "FIRDS_INDEX_FILE";
/// Environment variable overriding [`BatchConfig::workers`]
pub const ENV_WORKERS: &str = "FIRDS_WORKERS";

/// Configuration for the batch coordinator
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of worker threads; `None` uses half the available CPUs
    pub workers: Option<usize>,
    /// Show a progress bar while files are processed
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: None,
            show_progress: true,
        }
    }
}

impl BatchConfig {
    /// Worker count actually used for a batch (never zero)
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        match self.workers {
            Some(workers) => workers.max(1),
            None => default_workers(),
        }
    }
}

/// Default degree of parallelism: half the available CPUs, at least one
#[must_use]
pub fn default_workers() -> usize {
    (num_cpus::get() / 2).max(1)
}

/// Configuration for a full pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the working directory layout
    pub home_dir: PathBuf,
    /// Feed index listing the archives to download
    pub index_file: PathBuf,
    /// Prefix prepended to the dated artifact name
    pub artifact_prefix: String,
    /// Download and unzip archives before processing
    pub download: bool,
    /// Move locally published artifacts into `archive/`
    pub archive_published: bool,
    /// Schema used to extract records
    pub schema: ExtractionSchema,
    /// Batch coordinator settings
    pub batch: BatchConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let home_dir = PathBuf::from("firds-data");
        Self {
            index_file: home_dir.join("config").join("main.xml"),
            home_dir,
            artifact_prefix: String::new(),
            download: true,
            archive_published: true,
            schema: ExtractionSchema::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Configuration rooted at `home_dir` with the default index location
    #[must_use]
    pub fn with_home(home_dir: impl Into<PathBuf>) -> Self {
        let home_dir = home_dir.into();
        Self {
            index_file: home_dir.join("config").join("main.xml"),
            home_dir,
            ..Self::default()
        }
    }

    /// Default configuration overridden by `FIRDS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Default configuration overridden by values from `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_HOME) {
            Some(home) => Self::with_home(home),
            None => Self::default(),
        };

        if let Some(index) = lookup(ENV_INDEX_FILE) {
            config.index_file = PathBuf::from(index);
        }

        if let Some(workers) = lookup(ENV_WORKERS) {
            let parsed = workers
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|w| *w > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_WORKERS.to_string(),
                    value: workers.clone(),
                })?;
            config.batch.workers = Some(parsed);
        }

        Ok(config)
    }

    /// Replace the extraction schema with one loaded from a JSON file
    pub fn load_schema(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.schema = ExtractionSchema::from_json_file(path)?;
        Ok(())
    }

    #[must_use]
    pub fn downloads_dir(&self) -> PathBuf {
        self.home_dir.join("downloads")
    }

    #[must_use]
    pub fn out_dir(&self) -> PathBuf {
        self.home_dir.join("out")
    }

    #[must_use]
    pub fn archive_dir(&self) -> PathBuf {
        self.home_dir.join("archive")
    }

    #[must_use]
    pub fn temp_dir(&self) -> PathBuf {
        self.home_dir.join("temp")
    }
}
