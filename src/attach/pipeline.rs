//! The extraction pipeline: candidates in, ordered results out.
//!
//! Orchestrates collection, the deterministic size sort, per-entry
//! materialization and classification, filtering, and final rank/identifier
//! assignment. Everything downstream (listing, saving, preview) consumes
//! only the [`Attachment`] values produced here.

use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::collect::{Candidate, SourceArchive, collect};
use super::error::ExtractError;
use super::normalize::{FileKind, normalize};
use super::registry::ResourceHandle;
use super::sniff::{SNIFF_HEADER_LEN, sniff};

/// Suffix the note app appends to its own container files; stripped from
/// source names before they reach the user.
pub const CONTAINER_SUFFIX: &str = ".goodnotes";

/// Knobs for one extraction request.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Treat unrecognized attachment content as audio instead of dropping
    /// it. On by default: untagged voice recordings are the most common
    /// attachment these containers hold.
    pub assume_audio: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { assume_audio: true }
    }
}

/// One extracted attachment, ready for listing, preview, or saving.
#[derive(Debug)]
pub struct Attachment {
    /// Stable identifier, unique within a session (`file_{rank}`)
    pub id: String,
    /// Zero-based position after the size-descending sort, contiguous over
    /// accepted results
    pub rank: usize,
    /// Decompressed content
    pub bytes: Vec<u8>,
    pub kind: FileKind,
    /// Content length in bytes
    pub size: u64,
    /// Source container display name, container suffix stripped
    pub source: String,
    /// Staged byte-content reference, set once the attachment is registered
    /// in a session
    pub handle: Option<ResourceHandle>,
}

impl Attachment {
    /// Suggested filename for saving: cleaned source name, 1-based rank,
    /// canonical extension. Every character outside `[a-zA-Z0-9_-]` in the
    /// source name becomes `_`.
    pub fn download_name(&self) -> String {
        let base = if self.source.is_empty() {
            "file"
        } else {
            self.source.as_str()
        };
        let clean: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}_{}.{}", clean, self.rank + 1, self.kind.extension)
    }
}

/// Run the full extraction pipeline over a batch of containers.
///
/// Candidates are sorted by uncompressed size, descending, with ties kept
/// in collection order (stable sort), so output is deterministic across
/// runs on identical input. Each candidate is then materialized, sniffed,
/// and normalized; rejected or unreadable entries are skipped without
/// consuming a rank, so ranks in the result are contiguous.
///
/// Materialization and classification run concurrently per candidate, but
/// results are joined back into sorted order - completion order never
/// leaks into the output.
///
/// An empty result is a normal outcome (no attachments, or none accepted),
/// not an error.
///
/// # Errors
///
/// Fails only if a container cannot be decoded ([`ExtractError::Decode`]).
pub async fn extract(
    archives: &[SourceArchive],
    options: &ExtractOptions,
) -> Result<Vec<Attachment>, ExtractError> {
    let mut candidates = collect(archives).await?;
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    // Largest first; sort_by is stable, so equal sizes keep collection order.
    candidates.sort_by(|a, b| b.entry.uncompressed_size.cmp(&a.entry.uncompressed_size));

    let slot_count = candidates.len();
    let mut tasks = JoinSet::new();
    for (slot, candidate) in candidates.into_iter().enumerate() {
        let archive = archives[candidate.source_index].archive.clone();
        let assume_audio = options.assume_audio;
        tasks.spawn(async move {
            let classified = match archive.read(&candidate.entry).await {
                Ok(bytes) => {
                    let header = &bytes[..bytes.len().min(SNIFF_HEADER_LEN)];
                    match normalize(sniff(header), assume_audio) {
                        Some(kind) => Some((bytes, kind)),
                        None => {
                            debug!(path = %candidate.entry.path, "dropping unsupported attachment");
                            None
                        }
                    }
                }
                Err(err) => {
                    warn!(path = %candidate.entry.path, "skipping unreadable attachment: {err:#}");
                    None
                }
            };
            (slot, candidate, classified)
        });
    }

    // Join completed work back into its pre-spawn slot.
    let mut slots: Vec<Option<(Candidate, Vec<u8>, FileKind)>> =
        (0..slot_count).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((slot, candidate, Some((bytes, kind)))) => {
                slots[slot] = Some((candidate, bytes, kind));
            }
            Ok((_, _, None)) => {}
            Err(err) => warn!("attachment task failed: {err}"),
        }
    }

    let mut results = Vec::new();
    for (candidate, bytes, kind) in slots.into_iter().flatten() {
        let rank = results.len();
        results.push(Attachment {
            id: format!("file_{rank}"),
            rank,
            size: bytes.len() as u64,
            kind,
            source: display_source_name(&candidate.source_name),
            bytes,
            handle: None,
        });
    }

    Ok(results)
}

fn display_source_name(name: &str) -> String {
    name.strip_suffix(CONTAINER_SUFFIX).unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attach::normalize::Category;
    use crate::attach::sniff::SniffedType;

    fn attachment(source: &str, rank: usize) -> Attachment {
        Attachment {
            id: format!("file_{rank}"),
            rank,
            bytes: vec![0x49, 0x44, 0x33],
            kind: normalize(SniffedType::Mp3, true).unwrap(),
            size: 3,
            source: source.to_string(),
            handle: None,
        }
    }

    #[test]
    fn download_name_cleans_and_numbers() {
        let att = attachment("My Notes (2024)", 0);
        assert_eq!(att.download_name(), "My_Notes__2024__1.mp3");
    }

    #[test]
    fn download_name_falls_back_for_empty_source() {
        let att = attachment("", 4);
        assert_eq!(att.download_name(), "file_5.mp3");
    }

    #[test]
    fn download_name_keeps_allowed_characters() {
        let att = attachment("chem_lab-3", 1);
        assert_eq!(att.download_name(), "chem_lab-3_2.mp3");
        assert_eq!(att.kind.category, Category::Audio);
    }

    #[test]
    fn container_suffix_is_stripped() {
        assert_eq!(display_source_name("biology.goodnotes"), "biology");
        assert_eq!(display_source_name("plain-name"), "plain-name");
    }
}
