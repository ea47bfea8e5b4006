use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::Readiness;

pub const APP_DIR_NAME: &str = ".soundgrab";
pub const DEFAULT_PLAYER: &str = "mpv --no-video --really-quiet {input}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Downloads land under this directory.
    pub root_dir: PathBuf,
    /// Player command template, see [`crate::utils::render_command`].
    pub player_command: String,
    pub user_agent: String,
    pub chunk_size: usize,
    /// Bytes on disk before playback may start.
    pub min_buffer_bytes: u64,
    pub buffer_attempts: u32,
    pub buffer_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            player_command: DEFAULT_PLAYER.to_string(),
            user_agent: format!("soundgrab/{}", env!("CARGO_PKG_VERSION")),
            chunk_size: 8192,
            min_buffer_bytes: 32 * 1024,
            buffer_attempts: 5,
            buffer_interval_ms: 500,
        }
    }
}

impl Config {
    pub fn readiness(&self) -> Readiness {
        Readiness {
            min_bytes: self.min_buffer_bytes,
            attempts: self.buffer_attempts,
            interval: Duration::from_millis(self.buffer_interval_ms),
        }
    }

    /// Creates the root directory and any missing parents.
    pub async fn ensure_root_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await
    }
}

fn default_root_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_DIR_NAME),
        None => PathBuf::from(APP_DIR_NAME),
    }
}
