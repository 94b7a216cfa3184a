//! # notepluck
//!
//! Extract embedded attachments from note-taking app containers.
//!
//! Note containers are ZIP archives with an `attachments/` area holding
//! audio recordings, images, and PDFs under meaningless entry names. This
//! library scans one or more containers, identifies each attachment by its
//! binary signature (never by stored metadata), relabels the result into a
//! small whitelisted set of output types, and produces a stable, ordered,
//! uniquely-addressable result set ready for listing, preview, or saving.
//!
//! ## Features
//!
//! - Extract from local container files or HTTP/HTTPS URLs (Range requests)
//! - Content-based classification: MP3, PDF, PNG, JPG via magic numbers
//! - Deterministic output: size-descending order with stable tie-breaking
//! - Session-scoped result registry with leak-free staged content
//! - Batch saving with throttled, failure-tolerant sequential writes
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use notepluck::attach::{ExtractOptions, Session, SourceArchive, extract};
//! use notepluck::{LocalFileReader, ReadAt};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reader: Arc<dyn ReadAt> =
//!         Arc::new(LocalFileReader::new(Path::new("lecture.goodnotes"))?);
//!     let sources = vec![SourceArchive::new("lecture.goodnotes", reader)];
//!
//!     let results = extract(&sources, &ExtractOptions::default()).await?;
//!
//!     let mut session = Session::new()?;
//!     session.replace(results)?;
//!     for item in session.registry().all() {
//!         println!("{} ({} bytes)", item.download_name(), item.size);
//!     }
//!     Ok(())
//! }
//! ```

pub mod attach;
pub mod cli;
pub mod io;
pub mod logging;
pub mod save;
pub mod zip;

pub use attach::{Attachment, ExtractError, ExtractOptions, Registry, Session, SourceArchive};
pub use cli::Cli;
pub use io::{HttpRangeReader, LocalFileReader, ReadAt};
pub use zip::{ZipArchive, ZipEntry};
