//! Archive transport
//!
//! Fetches the zipped publications listed in the feed index and unpacks them
//! into the downloads directory.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::time::Duration;

use zip::ZipArchive;

use crate::error::FetchError;

/// Default timeout for a single archive download
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Source of archive bytes
pub trait ArchiveFetcher: Send + Sync {
    /// Fetch the archive at `link`
    fn fetch(&self, link: &str) -> Result<Vec<u8>, FetchError>;
}

/// Downloads archives over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// HTTP fetcher whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request {
                link: String::new(),
                detail: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, link: &str) -> Result<Vec<u8>, FetchError> {
        let request_failed = |e: reqwest::Error| FetchError::Request {
            link: link.to_string(),
            detail: e.to_string(),
        };
        let response = self
            .client
            .get(link)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(request_failed)?;
        Ok(response.bytes().map_err(request_failed)?.to_vec())
    }
}

/// Reads archives from the local filesystem (`file://` URLs or plain paths)
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFetcher;

impl ArchiveFetcher for LocalFetcher {
    fn fetch(&self, link: &str) -> Result<Vec<u8>, FetchError> {
        let path = Path::new(link.strip_prefix("file://").unwrap_or(link));
        fs::read(path).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Whether `link` must be fetched over HTTP(S)
#[must_use]
pub fn is_remote(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// Routes HTTP(S) links to an [`HttpFetcher`] and everything else to a
/// [`LocalFetcher`]
#[derive(Debug, Clone)]
pub struct SchemeFetcher {
    http: HttpFetcher,
    local: LocalFetcher,
}

impl SchemeFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpFetcher::new(timeout)?,
            local: LocalFetcher,
        })
    }
}

impl ArchiveFetcher for SchemeFetcher {
    fn fetch(&self, link: &str) -> Result<Vec<u8>, FetchError> {
        if is_remote(link) {
            self.http.fetch(link)
        } else {
            self.local.fetch(link)
        }
    }
}

/// Extract every file of the zip archive in `bytes` into `dir`
///
/// Returns the extracted file paths in archive order. Entries whose names
/// would escape `dir` are rejected.
pub fn unzip_into(bytes: &[u8], dir: &Path) -> Result<Vec<PathBuf>, FetchError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| FetchError::Archive(e.to_string()))?;
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| FetchError::Io { path, source }
    };

    let mut extracted = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| FetchError::Archive(e.to_string()))?;
        let relative = entry.enclosed_name().ok_or_else(|| {
            FetchError::Archive(format!("entry '{}' escapes the target directory", entry.name()))
        })?;
        let target = dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(io_error(&target))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        let mut out = File::create(&target).map_err(io_error(&target))?;
        io::copy(&mut entry, &mut out).map_err(io_error(&target))?;
        extracted.push(target);
    }
    Ok(extracted)
}

/// Fetch and unpack every archive in `links` into `dir`
///
/// Every link is attempted even after a failure.
///
/// # Errors
/// - [`FetchError::NothingToDownload`] if `links` is empty
/// - [`FetchError::Incomplete`] listing the links that failed
pub fn download_and_unzip<F: ArchiveFetcher + ?Sized>(
    links: &[String],
    fetcher: &F,
    dir: &Path,
) -> Result<Vec<PathBuf>, FetchError> {
    if links.is_empty() {
        log::error!("Nothing to download");
        return Err(FetchError::NothingToDownload);
    }

    log::info!("Starting download and unzip of {} files", links.len());
    let mut extracted = Vec::new();
    let mut failed = Vec::new();

    for link in links {
        log::info!("Downloading {link}");
        match fetcher.fetch(link).and_then(|bytes| unzip_into(&bytes, dir)) {
            Ok(files) => extracted.extend(files),
            Err(e) => {
                log::error!("Error downloading/unzipping {link}: {e}");
                failed.push(link.clone());
            }
        }
    }

    if !failed.is_empty() {
        return Err(FetchError::Incomplete { failed });
    }

    log::info!("Finished download and unzip: {} files extracted", extracted.len());
    Ok(extracted)
}
