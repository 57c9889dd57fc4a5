//! Error types for tagblocks-core
//!
//! Only setup paths (config, logging, transport construction) return these.
//! The click pipeline itself logs and degrades instead of failing.

use thiserror::Error;

/// Main error type for the tagblocks-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport error
    #[error("transport error: {0}")]
    Transport(String),

    /// URL parsing error
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for tagblocks-core
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageContext;

    #[test]
    fn test_bad_page_url_is_url_error() {
        let err = PageContext::new("not a url", "").unwrap_err();
        assert!(matches!(err, Error::Url(_)));
        assert!(err.to_string().starts_with("invalid URL"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
