use crate::core::{Result, Track};
use crate::utils::render_command;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

#[async_trait]
pub trait Player: Send + Sync {
    /// Plays `input` (a local path or a URL) and returns once playback ends.
    async fn play(&self, track: &Track, input: &str) -> Result<()>;
}

/// Runs an external player built from a command template.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    template: String,
}

impl CommandPlayer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

#[async_trait]
impl Player for CommandPlayer {
    async fn play(&self, track: &Track, input: &str) -> Result<()> {
        let argv = render_command(&self.template, track, input)?;
        debug!("Spawning player: {:?}", argv);

        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await?;

        // A failing player does not stop the run.
        if !status.success() {
            warn!("Player exited with {} for {}", status, track.title);
        }

        Ok(())
    }
}
