#![allow(dead_code)]

//! Shared test fixtures: an in-memory container source and a minimal
//! container builder (STORED entries, no comment, no ZIP64).

use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use notepluck::ReadAt;
use notepluck::attach::SourceArchive;

/// In-memory container source.
pub struct MemReader(pub Vec<u8>);

#[async_trait]
impl ReadAt for MemReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> anyhow::Result<usize> {
        let start = offset as usize;
        if start >= self.0.len() {
            bail!("read past end of buffer");
        }
        let end = (start + buf.len()).min(self.0.len());
        buf[..end - start].copy_from_slice(&self.0[start..end]);
        Ok(end - start)
    }

    fn size(&self) -> u64 {
        self.0.len() as u64
    }
}

/// Build a container from `(path, data, compression method)` triples.
///
/// Data is written as-is for every method, so method 0 (STORED) entries are
/// valid and any other method exercises decoder failure paths.
pub fn build_zip(entries: &[(&str, &[u8], u16)]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for (path, data, method) in entries {
        let lfh_offset = out.len() as u32;
        let name = path.as_bytes();

        // Local File Header
        out.extend_from_slice(b"PK\x03\x04");
        out.extend_from_slice(&20u16.to_le_bytes()); // version needed
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&method.to_le_bytes());
        out.extend_from_slice(&[0u8; 8]); // mod time, mod date, crc32
        out.extend_from_slice(&(data.len() as u32).to_le_bytes()); // compressed
        out.extend_from_slice(&(data.len() as u32).to_le_bytes()); // uncompressed
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // extra field length
        out.extend_from_slice(name);
        out.extend_from_slice(data);

        // Central Directory File Header
        central.extend_from_slice(b"PK\x01\x02");
        central.extend_from_slice(&20u16.to_le_bytes()); // version made by
        central.extend_from_slice(&20u16.to_le_bytes()); // version needed
        central.extend_from_slice(&0u16.to_le_bytes()); // flags
        central.extend_from_slice(&method.to_le_bytes());
        central.extend_from_slice(&[0u8; 8]); // mod time, mod date, crc32
        central.extend_from_slice(&(data.len() as u32).to_le_bytes());
        central.extend_from_slice(&(data.len() as u32).to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes()); // extra field length
        central.extend_from_slice(&0u16.to_le_bytes()); // comment length
        central.extend_from_slice(&0u16.to_le_bytes()); // disk number start
        central.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
        central.extend_from_slice(&0u32.to_le_bytes()); // external attrs
        central.extend_from_slice(&lfh_offset.to_le_bytes());
        central.extend_from_slice(name);
    }

    let cd_offset = out.len() as u32;
    let cd_size = central.len() as u32;
    out.extend_from_slice(&central);

    // End of Central Directory
    out.extend_from_slice(b"PK\x05\x06");
    out.extend_from_slice(&0u16.to_le_bytes()); // disk number
    out.extend_from_slice(&0u16.to_le_bytes()); // disk with cd
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // comment length

    out
}

/// Build a container of STORED entries.
pub fn stored(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let with_method: Vec<(&str, &[u8], u16)> =
        entries.iter().map(|(path, data)| (*path, *data, 0u16)).collect();
    build_zip(&with_method)
}

/// Wrap container bytes as a submitted source.
pub fn source(name: &str, container: Vec<u8>) -> SourceArchive {
    let reader: Arc<dyn ReadAt> = Arc::new(MemReader(container));
    SourceArchive::new(name, reader)
}

/// Bytes that sniff as MP3 (ID3 tag), padded to `len`.
pub fn id3_bytes(len: usize, fill: u8) -> Vec<u8> {
    let mut bytes = vec![0x49, 0x44, 0x33];
    bytes.resize(len, fill);
    bytes
}

/// Bytes that sniff as PDF, padded to `len`.
pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(len, b' ');
    bytes
}
