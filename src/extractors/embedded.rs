//! Track data embedded as JSON literals inside inline `<script>` blocks.

use crate::core::{Error, PageFetcher, Result};
use futures::Stream;
use scraper::{Html, Selector};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use url::Url;

/// What one page contributes: its script texts and the raw `next` link.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Page {
    pub scripts: Vec<String>,
    pub next: Option<String>,
}

/// Pulls inline script texts and the pagination link out of a document.
#[derive(Debug)]
pub struct ScriptExtractor {
    scripts: Selector,
    next: Selector,
}

impl ScriptExtractor {
    pub fn new(scripts: &str, next: &str) -> Result<Self> {
        Ok(Self {
            scripts: parse_selector(scripts)?,
            next: parse_selector(next)?,
        })
    }

    /// Script texts in document order. Empty when nothing matches.
    pub fn extract(&self, html: &str) -> Vec<String> {
        self.extract_page(html).scripts
    }

    pub fn next_link(&self, html: &str) -> Option<String> {
        self.extract_page(html).next
    }

    /// Parses `html` once for both scripts and the next link.
    pub fn extract_page(&self, html: &str) -> Page {
        let document = Html::parse_document(html);

        let scripts = document
            .select(&self.scripts)
            .map(|element| element.text().collect::<String>())
            .collect();

        let next = document
            .select(&self.next)
            .find_map(|element| element.value().attr("href"))
            .map(str::to_string);

        Page { scripts, next }
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| Error::Selector(css.to_string()))
}

/// Decodes the JSON literal wrapped by a fixed-width statement, e.g.
/// `\nwindow.SC.bufferTracks.push({...});\n`.
///
/// Offsets count characters. A change in the wrapping statement makes every
/// block fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackDataParser {
    pub prefix_len: usize,
    pub suffix_len: usize,
}

impl TrackDataParser {
    pub const fn new(prefix_len: usize, suffix_len: usize) -> Self {
        Self {
            prefix_len,
            suffix_len,
        }
    }

    /// `None` for short, malformed or non-JSON text.
    pub fn parse(&self, text: &str) -> Option<Value> {
        let len = text.chars().count();
        if len < self.prefix_len + self.suffix_len {
            return None;
        }

        let start = char_offset(text, self.prefix_len);
        let end = char_offset(text, len - self.suffix_len);

        serde_json::from_str(&text[start..end]).ok()
    }
}

fn char_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Cursor over the raw records of a page and every page after it.
///
/// Records are decoded on demand, so the first one is available before
/// the next page is requested. There is no cycle detection: a page linking
/// back to an earlier one is walked again.
pub struct PageWalker {
    fetcher: PageFetcher,
    extractor: Arc<ScriptExtractor>,
    parser: TrackDataParser,
    site_root: String,
    next_url: Option<String>,
    current_url: Option<String>,
    pending: VecDeque<String>,
    yielded_on_page: usize,
}

impl PageWalker {
    pub fn new(
        fetcher: PageFetcher,
        extractor: Arc<ScriptExtractor>,
        parser: TrackDataParser,
        site_root: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            parser,
            site_root: site_root.into(),
            next_url: Some(url.into()),
            current_url: None,
            pending: VecDeque::new(),
            yielded_on_page: 0,
        }
    }

    pub async fn next_record(&mut self) -> Result<Option<Value>> {
        loop {
            while let Some(script) = self.pending.pop_front() {
                match self.parser.parse(&script) {
                    Some(record) => {
                        self.yielded_on_page += 1;
                        return Ok(Some(record));
                    }
                    None => trace!("Skipping script block without track data"),
                }
            }

            if let Some(done) = self.current_url.take() {
                if self.yielded_on_page == 0 {
                    warn!("No track data found on {}", done);
                }
            }

            let Some(url) = self.next_url.take() else {
                return Ok(None);
            };

            let html = self.fetcher.fetch(&url).await?;
            let page = self.extractor.extract_page(&html);
            debug!("{} script blocks on {}", page.scripts.len(), url);

            self.pending = page.scripts.into();
            self.next_url = page.next.map(|href| self.resolve_link(&href));
            self.current_url = Some(url);
            self.yielded_on_page = 0;
        }
    }

    /// Absolute links are kept; anything else is site-relative.
    fn resolve_link(&self, href: &str) -> String {
        match Url::parse(href) {
            Ok(url) => url.into(),
            Err(_) => format!("{}{}", self.site_root, href),
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> + Send {
        futures::stream::try_unfold(self, |mut walker| async move {
            let record = walker.next_record().await?;
            Ok::<_, Error>(record.map(|record| (record, walker)))
        })
    }
}
