//! Low-level container parser.
//!
//! Note containers are ZIP archives, and ZIP archives are designed to be
//! read from the end: find the End of Central Directory (EOCD), then walk
//! the Central Directory for entry metadata, then read each entry's Local
//! File Header to locate its data. Reading tail-first means listing the
//! attachments of a remote container costs a couple of Range requests, not
//! a full download.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Result, bail};

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Low-level container parser.
///
/// Generic over the reader so local files and HTTP sources are decoded the
/// same way; `?Sized` so a batch of mixed sources can share `Arc<dyn ReadAt>`.
/// Typically used through [`ZipArchive`](super::ZipArchive) rather than
/// directly.
pub struct ZipParser<R: ReadAt + ?Sized> {
    /// The underlying data source
    reader: Arc<R>,
    /// Total size of the container in bytes
    size: u64,
}

impl<R: ReadAt + ?Sized> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// The EOCD sits at the very end of the container unless the archive
    /// carries a trailing comment, in which case we search backwards for
    /// the signature.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid EOCD can be found, indicating the file
    /// is not a valid container archive.
    pub async fn find_eocd(&self) -> Result<EndOfCentralDirectory> {
        const EOCD_LEN: usize = EndOfCentralDirectory::SIZE;

        // Fast path: no comment, EOCD is the last 22 bytes.
        if self.size >= EOCD_LEN as u64 {
            let mut record = vec![0u8; EOCD_LEN];
            self.reader
                .read_at(self.size - EOCD_LEN as u64, &mut record)
                .await?;

            let comment_free = &record[20..22] == b"\x00\x00";
            if record.starts_with(EndOfCentralDirectory::SIGNATURE) && comment_free {
                return EndOfCentralDirectory::from_bytes(&record);
            }
        }

        // A comment pushes the EOCD away from the end; scan backwards over
        // the maximum comment window for the signature.
        let window = (MAX_COMMENT_SIZE + EOCD_LEN as u64).min(self.size);
        let mut tail = vec![0u8; window as usize];
        self.reader.read_at(self.size - window, &mut tail).await?;

        for pos in (0..tail.len().saturating_sub(EOCD_LEN)).rev() {
            if !tail[pos..].starts_with(EndOfCentralDirectory::SIGNATURE) {
                continue;
            }
            // A real EOCD's comment length covers exactly the remaining bytes.
            let comment_len = u16::from_le_bytes([tail[pos + 20], tail[pos + 21]]) as usize;
            if comment_len == tail.len() - pos - EOCD_LEN {
                return EndOfCentralDirectory::from_bytes(&tail[pos..pos + EOCD_LEN]);
            }
        }

        bail!("Not a valid ZIP container")
    }

    /// List all entries in the container.
    ///
    /// Reads the EOCD, then fetches and parses the entire Central Directory
    /// in a single read. No entry data is touched.
    pub async fn entries(&self) -> Result<Vec<ZipEntry>> {
        let eocd = self.find_eocd().await?;

        if eocd.is_zip64() {
            bail!("ZIP64 containers are not supported");
        }

        let mut cd_data = vec![0u8; eocd.cd_size as usize];
        self.reader.read_at(eocd.cd_offset as u64, &mut cd_data).await?;

        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        let mut cursor = Cursor::new(&cd_data);

        for _ in 0..eocd.total_entries {
            entries.push(self.parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Parse one Central Directory File Header from a cursor.
    fn parse_cdfh(&self, cursor: &mut Cursor<&Vec<u8>>) -> Result<ZipEntry> {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            bail!("Invalid Central Directory File Header");
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let _flags = cursor.read_u16::<LittleEndian>()?;
        let method = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let _crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let path_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut path_bytes = vec![0u8; path_length as usize];
        cursor.read_exact(&mut path_bytes)?;
        // Lossy conversion keeps entries with non-UTF8 names listable.
        let path = String::from_utf8_lossy(&path_bytes).to_string();

        // Directory entries end with '/'
        let is_directory = path.ends_with('/');

        // Extra fields and comments carry nothing we consult.
        cursor.set_position(
            cursor.position() + extra_field_length as u64 + comment_length as u64,
        );

        Ok(ZipEntry {
            path,
            method: CompressionMethod::from_u16(method),
            compressed_size,
            uncompressed_size,
            lfh_offset,
            is_directory,
        })
    }

    /// Get the actual data offset for an entry.
    ///
    /// The Local File Header repeats the variable-length fields (path,
    /// extra field) with its own lengths, so the data offset can only be
    /// computed by reading it.
    pub async fn data_offset(&self, entry: &ZipEntry) -> Result<u64> {
        let mut header = vec![0u8; LFH_SIZE];
        self.reader.read_at(entry.lfh_offset, &mut header).await?;

        if !header.starts_with(LFH_SIGNATURE) {
            bail!("Invalid Local File Header");
        }

        // The two variable-length field sizes sit at fixed positions 26/28.
        let mut cursor = Cursor::new(&header[26..]);
        let path_len = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_len = cursor.read_u16::<LittleEndian>()? as u64;

        Ok(entry.lfh_offset + LFH_SIZE as u64 + path_len + extra_len)
    }

    /// Get a reference to the underlying reader.
    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}
