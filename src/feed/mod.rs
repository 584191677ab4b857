//! Feed index parsing
//!
//! The feed index is a search-response XML listing one `doc` per published
//! file. Each `doc` holds `str` fields; the one named `download_link` carries
//! the archive URL.

use std::path::Path;

use crate::document::{DocumentLoader, Node, RawDocument};
use crate::error::FeedError;

/// Name of the `str` field that carries an archive URL
pub const DOWNLOAD_LINK_FIELD: &str = "download_link";

/// Load the feed index at `path` and return its download links
pub fn load_feed_index<L: DocumentLoader + ?Sized>(
    loader: &L,
    path: &Path,
) -> Result<Vec<String>, FeedError> {
    log::info!("Getting files to download from {}", path.display());
    let doc = loader.load(path)?;
    let links = parse_feed_index(&doc)?;
    log::info!("Found {} files to download", links.len());
    Ok(links)
}

/// Collect the download links of a parsed feed index, in document order
///
/// # Errors
/// Returns [`FeedError::Structure`] if `response/result` is missing or a
/// `doc` or `str` entry has an unexpected shape.
pub fn parse_feed_index(doc: &RawDocument) -> Result<Vec<String>, FeedError> {
    let result = doc
        .root()
        .get("response")
        .and_then(|response| response.get("result"))
        .ok_or_else(|| FeedError::Structure("missing response/result".to_string()))?;

    let Some(docs) = result.get("doc") else {
        return Ok(Vec::new());
    };
    let docs = docs
        .items()
        .ok_or_else(|| FeedError::Structure("'doc' is not a list of entries".to_string()))?;

    let mut links = Vec::new();
    for (index, entry) in docs.into_iter().enumerate() {
        let Some(fields) = entry.get("str") else {
            continue;
        };
        let fields = fields.items().ok_or_else(|| {
            FeedError::Structure(format!("'str' fields of doc {index} are not a list"))
        })?;

        links.extend(fields.into_iter().filter_map(download_link));
    }
    Ok(links)
}

fn download_link(field: &Node) -> Option<String> {
    let name = field.get("@name").and_then(Node::as_text)?;
    if name != DOWNLOAD_LINK_FIELD {
        return None;
    }
    field
        .scalar()
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(String::from)
}
