use crate::core::{Error, PageFetcher, Result, Track};
use futures::stream::BoxStream;
use std::sync::Arc;
use tracing::debug;

/// Lazy sequence of tracks. Pages are fetched as the stream is polled.
pub type TrackStream = BoxStream<'static, Result<Track>>;

pub trait Source: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this source claims `url`.
    fn suitable(&self, url: &str) -> bool;

    fn scrape(&self, url: &str) -> TrackStream;
}

/// Sources keyed by identifier, probed in registration order.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    sources: Vec<(String, Arc<dyn Source>)>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every source compiled into this build.
    #[allow(unused_variables, unused_mut)]
    pub fn with_default_sources(fetcher: &PageFetcher) -> Result<Self> {
        let mut registry = Self::new();

        #[cfg(feature = "soundcloud")]
        {
            let soundcloud = crate::extractors::SoundCloud::new(fetcher.clone())?;
            registry.register("soundcloud", Arc::new(soundcloud));
        }

        Ok(registry)
    }

    /// Adds `source` under `identifier`, replacing any earlier entry with the
    /// same identifier while keeping its position.
    pub fn register(&mut self, identifier: impl Into<String>, source: Arc<dyn Source>) {
        let identifier = identifier.into();
        debug!("Registering source {} ({})", identifier, source.name());

        match self.sources.iter_mut().find(|(id, _)| *id == identifier) {
            Some(entry) => entry.1 = source,
            None => self.sources.push((identifier, source)),
        }
    }

    pub fn by_identifier(&self, identifier: &str) -> Option<Arc<dyn Source>> {
        self.sources
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, source)| Arc::clone(source))
    }

    pub fn detect(&self, url: &str) -> Option<Arc<dyn Source>> {
        self.sources
            .iter()
            .find(|(_, source)| source.suitable(url))
            .map(|(_, source)| Arc::clone(source))
    }

    /// Picks the named source, or auto-detects one from `url`.
    pub fn resolve(&self, identifier: Option<&str>, url: &str) -> Result<Arc<dyn Source>> {
        match identifier {
            Some(identifier) => self
                .by_identifier(identifier)
                .ok_or_else(|| Error::UnknownSource(identifier.to_string())),
            None => self
                .detect(url)
                .ok_or_else(|| Error::NoSource(url.to_string())),
        }
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    struct Fixed {
        name: &'static str,
        domain: &'static str,
    }

    impl Source for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn suitable(&self, url: &str) -> bool {
            url.contains(self.domain)
        }

        fn scrape(&self, _url: &str) -> TrackStream {
            Box::pin(stream::empty())
        }
    }

    fn registry() -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        registry.register(
            "first",
            Arc::new(Fixed {
                name: "first",
                domain: "example.com",
            }),
        );
        registry.register(
            "second",
            Arc::new(Fixed {
                name: "second",
                domain: "example",
            }),
        );
        registry
    }

    #[test]
    fn test_detect_uses_registration_order() {
        let registry = registry();

        let source = registry.detect("https://example.com/a").unwrap();
        assert_eq!(source.name(), "first");

        let source = registry.detect("https://example.org/a").unwrap();
        assert_eq!(source.name(), "second");

        assert!(registry.detect("https://other.org/").is_none());
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = registry();
        registry.register(
            "first",
            Arc::new(Fixed {
                name: "replacement",
                domain: "example.com",
            }),
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.identifiers().collect::<Vec<_>>(), ["first", "second"]);
        assert_eq!(registry.by_identifier("first").unwrap().name(), "replacement");
    }

    #[test]
    fn test_default_sources() {
        assert!(SourceRegistry::new().is_empty());

        let registry =
            SourceRegistry::with_default_sources(&PageFetcher::new(reqwest::Client::new()))
                .unwrap();
        assert_eq!(registry.is_empty(), cfg!(not(feature = "soundcloud")));
        #[cfg(feature = "soundcloud")]
        assert_eq!(
            registry.detect("https://soundcloud.com/a/b").unwrap().name(),
            "soundcloud"
        );
    }

    #[test]
    fn test_resolve_errors() {
        let registry = registry();

        assert!(matches!(
            registry.resolve(Some("missing"), "https://example.com/"),
            Err(Error::UnknownSource(id)) if id == "missing"
        ));
        assert!(matches!(
            registry.resolve(None, "https://other.org/"),
            Err(Error::NoSource(_))
        ));
        assert_eq!(
            registry
                .resolve(Some("second"), "https://example.com/")
                .unwrap()
                .name(),
            "second"
        );
    }
}
