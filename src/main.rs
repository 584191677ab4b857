use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use firds_reader::{Pipeline, PipelineConfig};

/// Extract FIRDS instrument reference data into a dated CSV file
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Working directory (downloads/, out/, archive/, temp/) [env: FIRDS_HOME]
    #[arg(long)]
    home: Option<PathBuf>,

    /// Feed index listing the archives to download [env: FIRDS_INDEX_FILE]
    #[arg(long)]
    index: Option<PathBuf>,

    /// Number of worker threads, default half the CPUs [env: FIRDS_WORKERS]
    #[arg(long)]
    workers: Option<usize>,

    /// JSON file overriding the extraction schema
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Prefix for the published artifact name
    #[arg(long, default_value = "")]
    prefix: String,

    /// Process the XML files already in downloads/ instead of fetching
    #[arg(long)]
    skip_download: bool,

    /// Leave the published artifact in out/
    #[arg(long)]
    no_archive: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    /// Environment configuration overridden by command line arguments
    fn into_config(self) -> anyhow::Result<PipelineConfig> {
        let mut config = PipelineConfig::from_env().context("Invalid FIRDS_* environment")?;
        if let Some(home) = self.home {
            config.index_file = home.join("config").join("main.xml");
            config.home_dir = home;
        }
        if let Some(index) = self.index {
            config.index_file = index;
        }
        if let Some(path) = self.schema {
            config
                .load_schema(&path)
                .with_context(|| format!("Failed to load schema from {}", path.display()))?;
        }
        if self.workers.is_some() {
            config.batch.workers = self.workers;
        }
        config.batch.show_progress = !self.no_progress;
        config.artifact_prefix = self.prefix;
        config.download = !self.skip_download;
        config.archive_published = !self.no_archive;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config()?;
    let start = Instant::now();
    info!("Started process with home {}", config.home_dir.display());

    let pipeline = Pipeline::new(config).context("Failed to set up pipeline")?;
    match pipeline.run() {
        Ok(report) => {
            info!(
                "Published {} rows to {} in {:?}",
                report.artifact.rows,
                report
                    .archived
                    .as_ref()
                    .map_or(report.artifact.location.clone(), |p| p.display().to_string()),
                start.elapsed()
            );
            Ok(())
        }
        Err(e) => {
            error!("Process ended unsuccessfully: {e}");
            Err(e.into())
        }
    }
}
