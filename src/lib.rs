pub mod cli;
pub mod config;
pub mod core;
pub mod extractors;
pub mod utils;

pub use core::{
    Downloader, Error, PageFetcher, Result, Source, SourceRegistry, StreamCoordinator, Track,
};
#[cfg(feature = "soundcloud")]
pub use extractors::SoundCloud;
