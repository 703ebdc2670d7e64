//! Error types for ddns-daddy.

use thiserror::Error;

/// Result type alias for ddns-daddy.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// DDNS error types.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// Registrar API rejected a record read or write.
    #[error("Registrar error for {target}: HTTP {status}: {body}")]
    Registrar {
        target: String,
        status: u16,
        body: String,
    },

    /// IP detection error.
    #[error("IP detection failed: {0}")]
    IpDetection(String),

    /// Last-IP cache could not be read or written.
    #[error("Cache error: {0}")]
    Cache(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DdnsError {
    fn from(e: reqwest::Error) -> Self {
        DdnsError::Network(e.to_string())
    }
}

impl From<toml::de::Error> for DdnsError {
    fn from(e: toml::de::Error) -> Self {
        DdnsError::Config(e.to_string())
    }
}
