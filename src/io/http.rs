//! Remote note containers over HTTP Range requests.

use std::time::Duration;

use anyhow::{Result, bail, ensure};
use async_trait::async_trait;
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, RANGE};
use reqwest::{Client, StatusCode};
use tracing::warn;

use super::ReadAt;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 10;

/// Remote note container served over HTTP.
///
/// The decoder reads containers tail-first, so listing a remote container
/// costs a couple of Range requests; only selected attachments are ever
/// fetched in full.
pub struct HttpRangeReader {
    client: Client,
    url: String,
    len: u64,
}

impl HttpRangeReader {
    /// Probe `url` with a HEAD request, verifying Range support and learning
    /// the container's size.
    pub async fn new(url: String) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        let head = client.head(&url).send().await?;
        ensure!(
            head.status().is_success(),
            "HEAD request failed with status {}",
            head.status()
        );

        let ranges_ok = head
            .headers()
            .get(ACCEPT_RANGES)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("bytes"));
        ensure!(ranges_ok, "server does not accept Range requests");

        let len = match head
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
        {
            Some(len) => len,
            None => bail!("server did not report a Content-Length"),
        };

        Ok(Self { client, url, len })
    }

    /// Fetch one byte range, retrying transient connection failures with a
    /// linear backoff.
    async fn fetch(&self, start: u64, end: u64) -> Result<Vec<u8>> {
        let range = format!("bytes={start}-{end}");
        let mut attempt = 0u32;

        loop {
            match self.client.get(&self.url).header(RANGE, &range).send().await {
                Ok(resp) => {
                    if resp.status() != StatusCode::PARTIAL_CONTENT {
                        bail!("range request failed with status {}", resp.status());
                    }
                    return Ok(resp.bytes().await?.to_vec());
                }
                Err(err) if err.is_timeout() || err.is_connect() => {
                    attempt += 1;
                    if attempt >= MAX_ATTEMPTS {
                        bail!("giving up after {attempt} connection failures");
                    }
                    warn!("range request failed, attempt {attempt}/{MAX_ATTEMPTS}: {err}");
                    tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[async_trait]
impl ReadAt for HttpRangeReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() || offset >= self.len {
            return Ok(0);
        }

        let last = (offset + buf.len() as u64 - 1).min(self.len - 1);
        let want = (last - offset + 1) as usize;

        // Servers may answer with less than the requested window; keep
        // asking for the remainder.
        let mut got = 0usize;
        while got < want {
            let chunk = self.fetch(offset + got as u64, last).await?;
            if chunk.is_empty() {
                bail!("server returned an empty range body");
            }
            let take = chunk.len().min(want - got);
            buf[got..got + take].copy_from_slice(&chunk[..take]);
            got += take;
        }

        Ok(got)
    }

    fn size(&self) -> u64 {
        self.len
    }
}
