//! Error types shared across the thaw crates

use thiserror::Error;

/// Main error type for bundle inspection
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Bundle root not found: {0}")]
    BundleRootNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bundle source error: {0}")]
    Source(String),

    #[error("{0}")]
    Custom(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn bundle_root_not_found(msg: impl Into<String>) -> Self {
        Self::BundleRootNotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}
