//! Working directory layout
//!
//! A run works inside a home directory with `downloads/` (unpacked XML),
//! `out/` (artifacts before upload), `archive/` (published artifacts) and
//! `temp/`.

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::config::PipelineConfig;
use crate::error::WorkspaceError;
use crate::utils::logging::{log_files_found, log_scan_start};

/// Directories used by one pipeline run
#[derive(Debug, Clone)]
pub struct Workspace {
    downloads: PathBuf,
    out: PathBuf,
    archive: PathBuf,
    temp: PathBuf,
}

impl Workspace {
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            downloads: config.downloads_dir(),
            out: config.out_dir(),
            archive: config.archive_dir(),
            temp: config.temp_dir(),
        }
    }

    #[must_use]
    pub fn downloads_dir(&self) -> &Path {
        &self.downloads
    }

    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out
    }

    #[must_use]
    pub fn archive_dir(&self) -> &Path {
        &self.archive
    }

    /// Create any missing directory of the layout
    pub fn prepare(&self) -> Result<(), WorkspaceError> {
        for dir in [&self.downloads, &self.out, &self.archive, &self.temp] {
            fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
        }
        Ok(())
    }

    /// Remove the files left in `downloads/` and `out/` by a previous run
    pub fn clear_old_files(&self) -> Result<usize, WorkspaceError> {
        log::info!("Clearing old files");
        let removed = clear_files(&self.downloads)? + clear_files(&self.out)?;
        log::info!("Done clearing {removed} old files");
        Ok(removed)
    }

    /// XML files in `downloads/`, sorted by file name
    pub fn xml_files(&self) -> Result<Vec<PathBuf>, WorkspaceError> {
        log_scan_start(&self.downloads);
        let entries =
            fs::read_dir(&self.downloads).map_err(|source| io_error(&self.downloads, source))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|source| io_error(&self.downloads, source))?.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
            {
                files.push(path);
            }
        }
        let files = files.into_iter().sorted().collect_vec();

        log_files_found(&self.downloads, files.len());
        Ok(files)
    }

    /// Move a published artifact from `out/` into `archive/`
    pub fn archive(&self, artifact: &Path) -> Result<PathBuf, WorkspaceError> {
        fs::create_dir_all(&self.archive).map_err(|source| io_error(&self.archive, source))?;
        let name = artifact.file_name().unwrap_or(artifact.as_os_str());
        let target = self.archive.join(name);
        if fs::rename(artifact, &target).is_err() {
            // Cross-device moves need a copy.
            fs::copy(artifact, &target).map_err(|source| io_error(&target, source))?;
            fs::remove_file(artifact).map_err(|source| io_error(artifact, source))?;
        }
        log::info!("Archived {} to {}", artifact.display(), target.display());
        Ok(target)
    }
}

fn clear_files(dir: &Path) -> Result<usize, WorkspaceError> {
    if !dir.exists() {
        return Ok(0);
    }
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(|source| io_error(dir, source))? {
        let path = entry.map_err(|source| io_error(dir, source))?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path).map_err(|source| io_error(&path, source))?;
        } else {
            fs::remove_file(&path).map_err(|source| io_error(&path, source))?;
        }
        removed += 1;
    }
    Ok(removed)
}

fn io_error(path: &Path, source: std::io::Error) -> WorkspaceError {
    WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    }
}
