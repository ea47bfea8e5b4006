use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// No registered source claims the URL.
    #[error("no source found for URL: {0}")]
    NoSource(String),

    #[error("unknown source `{0}`")]
    UnknownSource(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A decoded record is missing a field every track needs.
    #[error("malformed track record: {0}")]
    Normalization(#[from] serde_json::Error),

    #[error("invalid selector `{0}`")]
    Selector(String),

    #[error("invalid player command: {0}")]
    PlayerCommand(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }
}
