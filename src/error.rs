//! Error types for rs-chat-navigator.
//!
//! Extraction itself never fails (it degrades to fewer or no pairs); these
//! errors come from configuration, the message channel and CSV export.

/// Error type for fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured noise or heuristic pattern is not a valid regex.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A message could not be serialized or parsed.
    #[error("Message serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The cross-context channel refused or could not carry a message.
    #[error("Transport unavailable: {0}")]
    Transport(String),

    /// Table export failed (empty table, unusable file name, ...).
    #[error("Export failed: {0}")]
    Export(String),

    /// I/O failure while writing an export artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
