//! Keyed storage for extraction results and their staged content.
//!
//! A [`Session`] owns everything one extraction run produced: the registry
//! of results and the temp directory backing their resource handles.
//! Installing a new run's results releases every handle from the previous
//! run first, so repeated extractions in a long-lived process never
//! accumulate staged files.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use super::error::ExtractError;
use super::pipeline::Attachment;

/// A temporary, addressable reference to one result's byte content.
///
/// Preview and download collaborators read from this path instead of the
/// in-memory buffer. Released (file removed) when its session is replaced
/// or reset.
#[derive(Debug)]
pub struct ResourceHandle {
    path: PathBuf,
}

impl ResourceHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn release(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "released resource handle"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), "failed to release handle: {err}"),
        }
    }
}

/// Keyed store mapping result identifiers to attachments.
#[derive(Debug, Default)]
pub struct Registry {
    order: Vec<String>,
    items: HashMap<String, Attachment>,
}

impl Registry {
    pub fn put(&mut self, attachment: Attachment) {
        self.order.push(attachment.id.clone());
        self.items.insert(attachment.id.clone(), attachment);
    }

    pub fn get(&self, id: &str) -> Option<&Attachment> {
        self.items.get(id)
    }

    /// All attachments in rank order
    pub fn all(&self) -> impl Iterator<Item = &Attachment> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every stored attachment, releasing each live resource handle
    /// before the registry becomes empty.
    pub fn clear(&mut self) {
        for attachment in self.items.values() {
            if let Some(handle) = &attachment.handle {
                handle.release();
            }
        }
        self.items.clear();
        self.order.clear();
    }
}

/// Process state for one extraction lifecycle.
pub struct Session {
    staging: TempDir,
    registry: Registry,
}

impl Session {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            staging: tempfile::tempdir()?,
            registry: Registry::default(),
        })
    }

    /// Install a fresh extraction run, wholesale.
    ///
    /// Prior results and their handles are released first; then each new
    /// attachment is staged to the session's temp directory and registered
    /// under its identifier.
    pub fn replace(&mut self, results: Vec<Attachment>) -> Result<(), ExtractError> {
        self.registry.clear();
        for mut attachment in results {
            let path = self
                .staging
                .path()
                .join(format!("{}.{}", attachment.id, attachment.kind.extension));
            fs::write(&path, &attachment.bytes)?;
            attachment.handle = Some(ResourceHandle { path });
            self.registry.put(attachment);
        }
        Ok(())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Tear the session down: release every handle and empty the registry.
    pub fn reset(&mut self) {
        self.registry.clear();
    }
}
