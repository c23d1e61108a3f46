use thiserror::Error;

/// Errors that can occur while crawling and extracting recipes
#[derive(Error, Debug)]
pub enum CrawlError {
    /// The page answered with a non-success status code
    #[error("Failed to fetch {url}: status code {status}")]
    Fetch { url: String, status: u16 },

    /// Transport-level HTTP failure (connection, DNS, body decoding)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The completion text could not be read as a JSON object
    #[error("Malformed extraction: {0}")]
    MalformedExtraction(String),

    /// The completion service answered with an error or an unexpected body
    #[error("Completion failed: {0}")]
    Completion(String),

    /// Provider could not be constructed from configuration
    #[error("Provider error: {0}")]
    Provider(String),

    /// Failed to write or read a stored record
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode a stored record
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl CrawlError {
    /// HTTP status carried by a fetch failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CrawlError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}
