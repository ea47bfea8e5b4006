use crate::core::{DownloadStatus, Downloader, Player, Result, Source, Track};
use futures::TryStreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// When playback may start: once the file holds `min_bytes`, or after
/// `attempts` checks spaced by `interval`, whichever comes first.
///
/// The player reads the file while it is still being written. Nothing but
/// this delay orders the two. Checks also stop once the download task has
/// ended; if it ended with an error, playback is skipped and the error is
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub min_bytes: u64,
    pub attempts: u32,
    pub interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackOutcome {
    pub download: DownloadStatus,
}

/// Plays each track while it downloads, one track at a time.
pub struct StreamCoordinator {
    downloader: Downloader,
    player: Arc<dyn Player>,
    root_dir: PathBuf,
    readiness: Readiness,
}

impl StreamCoordinator {
    pub fn new(
        downloader: Downloader,
        player: Arc<dyn Player>,
        root_dir: impl Into<PathBuf>,
        readiness: Readiness,
    ) -> Self {
        Self {
            downloader,
            player,
            root_dir: root_dir.into(),
            readiness,
        }
    }

    pub fn local_path(&self, track: &Track) -> PathBuf {
        self.root_dir.join(&track.localname)
    }

    /// Streams every track `source` finds at `url`. Returns the track count.
    pub async fn stream(&self, source: &dyn Source, url: &str) -> Result<usize> {
        let mut tracks = source.scrape(url);
        let mut count = 0;

        while let Some(track) = tracks.try_next().await? {
            self.stream_track(&track).await?;
            count += 1;
        }

        Ok(count)
    }

    /// Downloads and plays one track concurrently. The download is cancelled
    /// as soon as the player exits.
    pub async fn stream_track(&self, track: &Track) -> Result<TrackOutcome> {
        let path = self.local_path(track);
        let stop = CancellationToken::new();

        info!("Streaming {}", track);

        let mut download: JoinHandle<Result<DownloadStatus>> = {
            let downloader = self.downloader.clone();
            let track = track.clone();
            let path = path.clone();
            let stop = stop.clone();
            tokio::spawn(async move { downloader.download(&track, &path, stop).await })
        };

        self.wait_until_buffered(&path, &download).await;

        // A download that already failed leaves nothing to play.
        let finished = if download.is_finished() {
            Some((&mut download).await??)
        } else {
            None
        };

        let playback = self.player.play(track, &path.to_string_lossy()).await;

        stop.cancel();
        let download = match finished {
            Some(status) => status,
            None => download.await??,
        };
        playback?;

        debug!(
            "Finished {} after {} bytes ({:?})",
            track.title,
            download.bytes(),
            download
        );

        Ok(TrackOutcome { download })
    }

    /// Downloads every track without playing it.
    pub async fn download(&self, source: &dyn Source, url: &str) -> Result<usize> {
        let mut tracks = source.scrape(url);
        let mut count = 0;

        while let Some(track) = tracks.try_next().await? {
            let path = self.local_path(&track);
            info!("Downloading {}", track);
            self.downloader
                .download(&track, &path, CancellationToken::new())
                .await?;
            count += 1;
        }

        Ok(count)
    }

    /// Hands each media URL straight to the player; nothing is written.
    pub async fn play(&self, source: &dyn Source, url: &str) -> Result<usize> {
        let mut tracks = source.scrape(url);
        let mut count = 0;

        while let Some(track) = tracks.try_next().await? {
            info!("Playing {}", track);
            self.player.play(&track, &track.url).await?;
            count += 1;
        }

        Ok(count)
    }

    async fn wait_until_buffered<T>(&self, path: &Path, download: &JoinHandle<T>) {
        for attempt in 0..self.readiness.attempts {
            let buffered = tokio::fs::metadata(path)
                .await
                .map(|meta| meta.len())
                .unwrap_or(0);

            if buffered >= self.readiness.min_bytes || download.is_finished() {
                debug!("Buffered {} bytes after {} checks", buffered, attempt);
                return;
            }

            tokio::time::sleep(self.readiness.interval).await;
        }

        debug!("Buffer wait exhausted, starting playback anyway");
    }
}
