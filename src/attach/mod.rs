//! Attachment extraction from note containers.
//!
//! ## Architecture
//!
//! The pipeline runs in dependency order:
//!
//! - [`sniff`]: classify a byte buffer by its binary signature
//! - [`normalize`]: map the sniffed type onto the whitelisted output kinds
//! - [`collect`]: find attachment entries across a batch of containers
//! - [`extract`]: sort, materialize, classify, filter, rank
//! - [`Session`]/[`Registry`]: session-scoped storage for results and
//!   their staged content
//!
//! The sniffer and normalizer are pure; the collector touches only entry
//! metadata; content is read exactly once, in the pipeline.

mod collect;
mod error;
mod normalize;
mod pipeline;
mod registry;
mod sniff;

pub use collect::{ATTACHMENTS_MARKER, Candidate, SourceArchive, collect};
pub use error::ExtractError;
pub use normalize::{ACCEPTED_EXTENSIONS, Category, FileKind, normalize};
pub use pipeline::{Attachment, CONTAINER_SUFFIX, ExtractOptions, extract};
pub use registry::{Registry, ResourceHandle, Session};
pub use sniff::{SNIFF_HEADER_LEN, SniffedType, sniff};
