use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::utils::format_duration;

/// One playable item discovered on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Direct location of the media resource.
    pub url: String,
    pub title: String,
    pub artist: String,
    /// Page URL sent as the `Referer` header when fetching `url`.
    pub referer: String,
    /// Length in milliseconds.
    pub duration: u64,
    /// Path relative to the download root. Not sanitized against `..`.
    pub localname: String,
}

impl Track {
    pub fn length(&self) -> Duration {
        Duration::from_millis(self.duration)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} [{}]",
            self.artist,
            self.title,
            format_duration(self.length())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let track = Track {
            url: "https://media.example.com/abc.mp3".to_string(),
            title: "Flight".to_string(),
            artist: "Someone".to_string(),
            referer: "https://soundcloud.com/someone/flight".to_string(),
            duration: 245_000,
            localname: "someone/flight.mp3".to_string(),
        };

        assert_eq!(track.to_string(), "Someone - Flight [4:05]");
        assert_eq!(track.length(), Duration::from_secs(245));
    }
}
