use crate::core::{Error, Result};
use tracing::debug;

/// Retrieves page HTML. One GET per call, no caching and no retries.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching page {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Error::fetch(url, e))?;

        response.text().await.map_err(|e| Error::fetch(url, e))
    }
}

/// Builds the HTTP client shared by page fetches and media downloads.
///
/// No timeout is set: a stalled server blocks the pipeline.
pub fn http_client(user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(Error::Client)
}
