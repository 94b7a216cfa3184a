use thiserror::Error;

/// Errors that abort an extraction request.
///
/// Only container decoding is fatal: an unreadable entry is skipped inside
/// the pipeline, and save failures are reported per file by the save
/// collaborator.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("'{name}' is not a valid note container: {source}")]
    Decode {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to stage extracted content: {0}")]
    Staging(#[from] std::io::Error),
}
