pub mod coordinator;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod player;
pub mod source;
pub mod track;

pub use coordinator::{Readiness, StreamCoordinator, TrackOutcome};
pub use downloader::{DownloadStatus, Downloader};
pub use error::{Error, Result};
pub use fetcher::{http_client, PageFetcher};
pub use player::{CommandPlayer, Player};
pub use source::{Source, SourceRegistry, TrackStream};
pub use track::Track;
