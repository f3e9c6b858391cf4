use thiserror::Error;

/// Main error type for the relation crawler
#[derive(Error, Debug)]
pub enum UmlsGraphError {
    /// Required configuration (e.g. the API key) is absent. Fatal before any crawl.
    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    /// The seed term could not be resolved; aborts the requested crawl only.
    #[error("Term not found: {0}")]
    TermNotFound(String),

    /// A single search/relations call failed. Absorbed per node during a crawl.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Language identification could not classify a related name.
    #[error("Language check failed: {0}")]
    LanguageCheckFailed(String),

    /// Parse errors (relationship listings, malformed payloads)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UmlsGraphError {
    /// Whether the error should be surfaced to the user rather than absorbed by the crawl.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            UmlsGraphError::ConfigMissing(_) | UmlsGraphError::TermNotFound(_)
        )
    }
}

/// Convenient Result type using UmlsGraphError
pub type Result<T> = std::result::Result<T, UmlsGraphError>;
