//! tedscribe - A Rust CLI tool for collecting TED talk transcripts
//!
//! This library fetches public TED talk pages, recovers each talk's metadata and
//! spoken-word transcript from the embedded JSON data (falling back to the rendered
//! markup), and produces structured records suitable for JSON/CSV/TXT export.

pub mod cli;
pub mod config;
pub mod extractor;
pub mod fetch;
pub mod model;
pub mod output;
pub mod parser;
pub mod text;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractor::TalkExtractor;
pub use model::{Talk, TranscriptSegment};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the extraction pipeline
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("Invalid TED talk URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("No usable talk data found in page: {0}")]
    Parse(String),
}

impl ExtractError {
    /// Whether a retry could plausibly change the outcome.
    ///
    /// Timeouts, connection errors, 5xx responses and 429 rate limiting are
    /// transient; validation, parse and other 4xx failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ExtractError::Network(_) | ExtractError::Timeout(_) => true,
            ExtractError::HttpStatus { status } => *status >= 500 || *status == 429,
            ExtractError::InvalidUrl(_) | ExtractError::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ExtractError::Timeout(30).is_transient());
        assert!(ExtractError::Network("connection reset".into()).is_transient());
        assert!(ExtractError::HttpStatus { status: 503 }.is_transient());
        assert!(ExtractError::HttpStatus { status: 429 }.is_transient());

        assert!(!ExtractError::HttpStatus { status: 404 }.is_transient());
        assert!(!ExtractError::InvalidUrl("https://example.com".into()).is_transient());
        assert!(!ExtractError::Parse("empty page".into()).is_transient());
    }
}
