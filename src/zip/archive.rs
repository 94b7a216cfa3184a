use flate2::read::DeflateDecoder;
use std::io::Read;
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipEntry};

/// Decoded view of one note container.
///
/// Exposes exactly what the attachment pipeline needs: entry enumeration
/// (metadata only) and per-entry materialization to memory.
pub struct ZipArchive<R: ReadAt + ?Sized> {
    parser: ZipParser<R>,
}

impl<R: ReadAt + ?Sized> ZipArchive<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all entries in the container without reading any content
    pub async fn entries(&self) -> Result<Vec<ZipEntry>> {
        self.parser.entries().await
    }

    /// Materialize an entry's decompressed bytes in memory
    pub async fn read(&self, entry: &ZipEntry) -> Result<Vec<u8>> {
        let data_offset = self.parser.data_offset(entry).await?;

        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser.reader().read_at(data_offset, &mut raw).await?;

        match entry.method {
            CompressionMethod::Stored => Ok(raw),
            CompressionMethod::Deflate => {
                let mut out = Vec::with_capacity(entry.uncompressed_size as usize);
                DeflateDecoder::new(&raw[..]).read_to_end(&mut out)?;
                Ok(out)
            }
            CompressionMethod::Unknown(method) => {
                bail!("Unsupported compression method: {}", method)
            }
        }
    }
}
