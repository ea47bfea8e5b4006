use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use futures::TryStreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::{
    http_client, CommandPlayer, Downloader, PageFetcher, Source, SourceRegistry,
    StreamCoordinator,
};

#[derive(Parser)]
#[command(name = "soundgrab")]
#[command(about = "Scrape, stream and download tracks from music-sharing pages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Decrease verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Disable logging entirely
    #[arg(short, long, global = true)]
    pub silent: bool,

    /// Increase verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Source to use instead of detecting it from the URL
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Directory downloads are written to
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Player command; {input}, {url}, {title}, {artist}, {referer},
    /// {duration} and {localname} are substituted
    #[arg(long, global = true)]
    pub player: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the tracks found at URL
    Scrape {
        #[arg(value_name = "URL")]
        url: String,

        /// Print one JSON object per track
        #[arg(long)]
        json: bool,
    },
    /// Play each track while downloading it
    Stream {
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Download each track without playing it
    Download {
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Play each track straight from its media URL
    Play {
        #[arg(value_name = "URL")]
        url: String,
    },
}

impl Command {
    pub fn url(&self) -> &str {
        match self {
            Self::Scrape { url, .. }
            | Self::Stream { url }
            | Self::Download { url }
            | Self::Play { url } => url.as_str(),
        }
    }
}

impl Cli {
    /// Installs the stderr subscriber unless `--silent` was given.
    pub fn init_logging(&self) {
        if self.silent {
            return;
        }

        tracing_subscriber::fmt()
            .with_max_level(log_level(self.verbose, self.quiet))
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(dir) = &self.dir {
            config.root_dir = dir.clone();
        }
        if let Some(player) = &self.player {
            config.player_command = player.clone();
        }
        config
    }

    pub async fn run(&self) -> Result<()> {
        let config = self.config();
        let url = self.command.url();

        let client = http_client(&config.user_agent)?;
        let registry = SourceRegistry::with_default_sources(&PageFetcher::new(client.clone()))?;
        if registry.is_empty() {
            warn!("No sources were compiled into this build");
        }

        // Resolved before any request is made.
        let source = registry.resolve(self.source.as_deref(), url)?;
        debug!("Using source {} for {}", source.name(), url);

        let coordinator = || {
            StreamCoordinator::new(
                Downloader::new(client.clone(), config.chunk_size),
                Arc::new(CommandPlayer::new(config.player_command.clone())),
                config.root_dir.clone(),
                config.readiness(),
            )
        };

        match &self.command {
            Command::Scrape { json, .. } => {
                let count = scrape(source.as_ref(), url, *json).await?;
                info!("Found {} tracks", count);
            }
            Command::Stream { .. } => {
                config.ensure_root_dir().await?;
                let count = coordinator().stream(source.as_ref(), url).await?;
                info!("Streamed {} tracks", count);
            }
            Command::Download { .. } => {
                config.ensure_root_dir().await?;
                let count = coordinator().download(source.as_ref(), url).await?;
                info!("Downloaded {} tracks", count);
            }
            Command::Play { .. } => {
                let count = coordinator().play(source.as_ref(), url).await?;
                info!("Played {} tracks", count);
            }
        }

        Ok(())
    }
}

async fn scrape(source: &dyn Source, url: &str, json: bool) -> Result<usize> {
    let mut tracks = source.scrape(url);
    let mut count = 0;

    while let Some(track) = tracks.try_next().await? {
        if json {
            println!("{}", serde_json::to_string(&track)?);
        } else {
            println!("{}", track);
            println!("  {}", track.url);
        }
        count += 1;
    }

    Ok(count)
}

/// WARN shifted one level per `-v`, back one per `-q`.
pub fn log_level(verbose: u8, quiet: u8) -> LevelFilter {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => LevelFilter::OFF,
        -1 => LevelFilter::ERROR,
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
