use crate::core::{Error, PageFetcher, Result, Source, Track, TrackStream};
use crate::extractors::embedded::{PageWalker, ScriptExtractor, TrackDataParser};
use futures::{future, TryStreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const DOMAIN: &str = "soundcloud.com";
pub const SITE_ROOT: &str = "https://soundcloud.com";

const SCRIPT_SELECTOR: &str = r#"div#main-content script[type="text/javascript"]"#;
const NEXT_SELECTOR: &str = r#"a[rel="next"]"#;

// `\nwindow.SC.bufferTracks.push(` and `);\n`
const PAYLOAD_PREFIX_LEN: usize = 29;
const PAYLOAD_SUFFIX_LEN: usize = 3;

const MEDIA_EXTENSION: &str = "mp3";

#[derive(Debug, Deserialize)]
struct RawTrack {
    title: String,
    #[serde(rename = "streamUrl")]
    stream_url: String,
    user: RawUser,
    /// Site-relative path, e.g. `/artist/track`.
    uri: String,
    duration: u64,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    username: String,
}

pub struct SoundCloud {
    fetcher: PageFetcher,
    extractor: Arc<ScriptExtractor>,
    site_root: String,
}

impl SoundCloud {
    pub fn new(fetcher: PageFetcher) -> Result<Self> {
        Self::with_site_root(fetcher, SITE_ROOT)
    }

    /// Uses `site_root` instead of the public site for referers and
    /// relative pagination links.
    pub fn with_site_root(fetcher: PageFetcher, site_root: impl Into<String>) -> Result<Self> {
        Ok(Self {
            fetcher,
            extractor: Arc::new(ScriptExtractor::new(SCRIPT_SELECTOR, NEXT_SELECTOR)?),
            site_root: site_root.into(),
        })
    }

    pub fn parser() -> TrackDataParser {
        TrackDataParser::new(PAYLOAD_PREFIX_LEN, PAYLOAD_SUFFIX_LEN)
    }

    /// Raw records from `url` and the pages that follow it.
    pub fn walk(&self, url: &str) -> PageWalker {
        PageWalker::new(
            self.fetcher.clone(),
            Arc::clone(&self.extractor),
            Self::parser(),
            self.site_root.clone(),
            url,
        )
    }

    pub fn normalize(&self, record: Value) -> Result<Track> {
        normalize(&self.site_root, record)
    }
}

fn normalize(site_root: &str, record: Value) -> Result<Track> {
    let raw: RawTrack = serde_json::from_value(record)?;

    if raw.stream_url.is_empty() {
        return Err(Error::Normalization(serde::de::Error::custom(
            "empty `streamUrl`",
        )));
    }

    Ok(Track {
        referer: format!("{}{}", site_root, raw.uri),
        localname: format!("{}.{}", raw.uri.trim_start_matches('/'), MEDIA_EXTENSION),
        url: raw.stream_url,
        title: raw.title,
        artist: raw.user.username,
        duration: raw.duration,
    })
}

impl Source for SoundCloud {
    fn name(&self) -> &'static str {
        "soundcloud"
    }

    /// Plain substring test: `notsoundcloud.com` matches too.
    fn suitable(&self, url: &str) -> bool {
        url.contains(DOMAIN)
    }

    fn scrape(&self, url: &str) -> TrackStream {
        let site_root = self.site_root.clone();

        Box::pin(
            self.walk(url)
                .into_stream()
                .and_then(move |record| future::ready(normalize(&site_root, record))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn soundcloud() -> SoundCloud {
        SoundCloud::new(PageFetcher::new(reqwest::Client::new())).unwrap()
    }

    #[test]
    fn test_suitable() {
        let soundcloud = soundcloud();

        assert!(soundcloud.suitable("https://soundcloud.com/x/y"));
        assert!(soundcloud.suitable("//soundcloud.com/x/y?page=2&x=1"));
        assert!(soundcloud.suitable("http://m.soundcloud.com/x"));
        // Substring matching also accepts other domains.
        assert!(soundcloud.suitable("https://notsoundcloud.com/x"));

        assert!(!soundcloud.suitable("https://SoundCloud.com/x"));
        assert!(!soundcloud.suitable("https://example.com/x"));
    }

    #[test]
    fn test_normalize() {
        let track = soundcloud()
            .normalize(json!({
                "title": "Flight",
                "streamUrl": "https://media.example.com/abc",
                "user": {"username": "someone"},
                "uri": "/someone/flight",
                "duration": 245000,
                "waveformUrl": "ignored"
            }))
            .unwrap();

        assert_eq!(track.url, "https://media.example.com/abc");
        assert_eq!(track.title, "Flight");
        assert_eq!(track.artist, "someone");
        assert_eq!(track.referer, "https://soundcloud.com/someone/flight");
        assert_eq!(track.duration, 245000);
        assert_eq!(track.localname, "someone/flight.mp3");
    }

    #[test]
    fn test_normalize_missing_field_fails() {
        let soundcloud = soundcloud();

        let missing_user = json!({
            "title": "Flight",
            "streamUrl": "https://media.example.com/abc",
            "uri": "/someone/flight",
            "duration": 1
        });
        assert!(matches!(
            soundcloud.normalize(missing_user),
            Err(Error::Normalization(_))
        ));

        let empty_url = json!({
            "title": "",
            "streamUrl": "",
            "user": {"username": ""},
            "uri": "/a",
            "duration": 1
        });
        assert!(matches!(
            soundcloud.normalize(empty_url),
            Err(Error::Normalization(_))
        ));

        assert!(soundcloud.normalize(json!(42)).is_err());
    }

    #[test]
    fn test_parser_matches_embedding() {
        let record = json!({"title": "t"});
        let script = format!("\nwindow.SC.bufferTracks.push({});\n", record);

        assert_eq!(SoundCloud::parser().parse(&script), Some(record));
    }
}
