use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::ReadAt;

/// Container file on disk.
///
/// Reads are positioned, so concurrent entry materializations can share one
/// open file without seeking over each other.
pub struct LocalFileReader {
    file: File,
    len: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open container '{}'", path.display()))?;
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            // pread may come back short; keep filling until the window is
            // full or the file ends.
            let mut filled = 0;
            while filled < buf.len() {
                let n = self
                    .file
                    .read_at(&mut buf[filled..], offset + filled as u64)?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            Ok(filled)
        }

        #[cfg(not(unix))]
        {
            use std::io::{Read, Seek, SeekFrom};
            let mut file = &self.file;
            file.seek(SeekFrom::Start(offset))?;
            let mut filled = 0;
            while filled < buf.len() {
                let n = file.read(&mut buf[filled..])?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            Ok(filled)
        }
    }

    fn size(&self) -> u64 {
        self.len
    }
}
