//! Persisting extracted attachments to disk.
//!
//! Single-file saves skip existing files unless overwriting is requested -
//! a skip is a normal outcome, like a cancelled save dialog, not an error.
//! Batch saves space out their starts by a fixed delay and keep going past
//! individual failures, reporting them at the end.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::attach::Attachment;

/// Default spacing between successive saves in a batch.
pub const BATCH_SAVE_DELAY: Duration = Duration::from_millis(300);

/// Outcome of a single save that did not fail.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The target existed and overwriting was not requested
    Skipped(PathBuf),
}

/// What happened across a batch save.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub saved: usize,
    pub skipped: usize,
    /// Per-file failures, by suggested filename
    pub failed: Vec<(String, std::io::Error)>,
}

/// Save one attachment into `dir` under its suggested filename.
pub async fn save_attachment(
    attachment: &Attachment,
    dir: &Path,
    overwrite: bool,
) -> std::io::Result<SaveOutcome> {
    fs::create_dir_all(dir).await?;

    let path = dir.join(attachment.download_name());
    if path.exists() && !overwrite {
        return Ok(SaveOutcome::Skipped(path));
    }

    let mut file = fs::File::create(&path).await?;
    file.write_all(&attachment.bytes).await?;
    debug!(path = %path.display(), "saved attachment");

    Ok(SaveOutcome::Saved(path))
}

/// Save every attachment in the batch, sequentially.
///
/// Successive saves start at least `delay` apart. A failed save is
/// recorded in the report and does not stop the rest of the batch.
pub async fn save_all<'a, I>(
    attachments: I,
    dir: &Path,
    overwrite: bool,
    delay: Duration,
) -> BatchReport
where
    I: IntoIterator<Item = &'a Attachment>,
{
    let mut report = BatchReport::default();
    let mut first = true;

    for attachment in attachments {
        if !first {
            tokio::time::sleep(delay).await;
        }
        first = false;

        match save_attachment(attachment, dir, overwrite).await {
            Ok(SaveOutcome::Saved(_)) => report.saved += 1,
            Ok(SaveOutcome::Skipped(_)) => report.skipped += 1,
            Err(err) => {
                warn!(name = %attachment.download_name(), "save failed: {err}");
                report.failed.push((attachment.download_name(), err));
            }
        }
    }

    report
}
