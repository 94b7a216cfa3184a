//! Locating attachment entries across a batch of containers.

use std::sync::Arc;

use crate::io::ReadAt;
use crate::zip::{ZipArchive, ZipEntry};

use super::error::ExtractError;

/// Path marker for the attachments area of a note container. Matching is
/// case-insensitive and positional: any entry whose path contains this
/// substring is a candidate.
pub const ATTACHMENTS_MARKER: &str = "attachments/";

/// One container submitted for extraction, with its display name.
pub struct SourceArchive {
    pub name: String,
    pub(crate) archive: Arc<ZipArchive<dyn ReadAt>>,
}

impl SourceArchive {
    pub fn new(name: impl Into<String>, reader: Arc<dyn ReadAt>) -> Self {
        Self {
            name: name.into(),
            archive: Arc::new(ZipArchive::new(reader)),
        }
    }
}

/// An entry selected from the attachments area, tagged with provenance.
#[derive(Debug)]
pub struct Candidate {
    /// Zero-based position of the source container in the submitted batch
    pub source_index: usize,
    /// Display name of the source container
    pub source_name: String,
    pub entry: ZipEntry,
}

/// Walk every container and gather attachment candidates.
///
/// Only metadata is consulted here: the path filter and the directory flag
/// come straight from the central directory, so no entry content is read
/// until the pipeline decides it wants it. Candidate order is submission
/// order, then enumeration order within each container; sorting happens
/// later in the pipeline.
///
/// # Errors
///
/// Fails with [`ExtractError::Decode`] if any container cannot be decoded;
/// this is the only fatal condition of an extraction request.
pub async fn collect(archives: &[SourceArchive]) -> Result<Vec<Candidate>, ExtractError> {
    let mut candidates = Vec::new();

    for (source_index, source) in archives.iter().enumerate() {
        let entries = source
            .archive
            .entries()
            .await
            .map_err(|source_err| ExtractError::Decode {
                name: source.name.clone(),
                source: source_err,
            })?;

        for entry in entries {
            if entry.is_directory {
                continue;
            }
            if !entry.path.to_lowercase().contains(ATTACHMENTS_MARKER) {
                continue;
            }
            candidates.push(Candidate {
                source_index,
                source_name: source.name.clone(),
                entry,
            });
        }
    }

    Ok(candidates)
}
