use crate::core::{Error, Result, Track};
use futures::TryStreamExt;
use reqwest::header::REFERER;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    /// The remote stream was exhausted.
    Completed { bytes: u64 },
    /// Stopped through the cancellation token. The file holds a prefix.
    Cancelled { bytes: u64 },
}

impl DownloadStatus {
    pub fn bytes(&self) -> u64 {
        match *self {
            Self::Completed { bytes } | Self::Cancelled { bytes } => bytes,
        }
    }
}

/// Streams a track's media resource to disk in fixed-size chunks.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    pub chunk_size: usize,
}

impl Downloader {
    pub fn new(client: reqwest::Client, chunk_size: usize) -> Self {
        Self {
            client,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Writes `track.url` to `output_path`, flushing after every chunk so a
    /// concurrent reader sees the bytes as they arrive.
    pub async fn download(
        &self,
        track: &Track,
        output_path: &Path,
        stop: CancellationToken,
    ) -> Result<DownloadStatus> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let request = self
            .client
            .get(&track.url)
            .header(REFERER, &track.referer)
            .send();

        let response = tokio::select! {
            response = request => response
                .and_then(|response| response.error_for_status())
                .map_err(|e| Error::fetch(&track.url, e))?,
            _ = stop.cancelled() => {
                debug!("Download of {} cancelled before response", track.url);
                return Ok(DownloadStatus::Cancelled { bytes: 0 });
            }
        };

        info!(
            "Downloading {} ({} bytes) to {}",
            track.title,
            response
                .content_length()
                .map_or("unknown".to_string(), |len| len.to_string()),
            output_path.display()
        );

        let mut file = File::create(output_path).await?;
        let mut reader =
            StreamReader::new(Box::pin(response.bytes_stream().map_err(std::io::Error::other)));
        let mut buf = vec![0u8; self.chunk_size];
        let mut written = 0u64;

        loop {
            let read = tokio::select! {
                read = reader.read(&mut buf) => read?,
                _ = stop.cancelled() => {
                    debug!("Download of {} cancelled after {} bytes", track.url, written);
                    return Ok(DownloadStatus::Cancelled { bytes: written });
                }
            };
            if read == 0 {
                break;
            }

            file.write_all(&buf[..read]).await?;
            file.flush().await?;
            written += read as u64;
        }

        info!("Downloaded {} bytes to {}", written, output_path.display());

        Ok(DownloadStatus::Completed { bytes: written })
    }
}
