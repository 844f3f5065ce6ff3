use thiserror::Error;

/// Pipeline stage names used in upstream failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Content,
    Generation,
    KeywordVolume,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Search => "search",
            Stage::Content => "content fetch",
            Stage::Generation => "report generation",
            Stage::KeywordVolume => "keyword volume",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream {stage} unavailable: {message}")]
    UpstreamUnavailable { stage: Stage, message: String },

    #[error("No results: {0}")]
    NoResults(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl Error {
    pub fn upstream(stage: Stage, message: impl Into<String>) -> Self {
        Error::UpstreamUnavailable {
            stage,
            message: message.into(),
        }
    }

    /// True for the zero-results state, which callers report differently
    /// from an upstream outage.
    pub fn is_no_results(&self) -> bool {
        matches!(self, Error::NoResults(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
