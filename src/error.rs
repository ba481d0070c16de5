//! Custom error types for Archy.
//!
//! Every fallible operation in the crate returns [`ArchyError`]; command
//! handlers box it into the poise-compatible [`crate::types::Error`].

use std::fmt;

/// Main error type for Archy operations.
#[derive(Debug)]
pub enum ArchyError {
    /// Configuration errors (missing env vars, invalid values)
    Config(String),
    /// Document database (Firestore) errors
    FlagStore(String),
    /// The main node rejected or failed a command
    MainNode(String),
    /// Network/HTTP errors
    Network(String),
    /// Response payloads that could not be decoded
    Decode(String),
}

impl fmt::Display for ArchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::FlagStore(msg) => write!(f, "Flag store error: {}", msg),
            Self::MainNode(msg) => write!(f, "Main node error: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for ArchyError {}

impl From<reqwest::Error> for ArchyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<base64::DecodeError> for ArchyError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(format!("Invalid base64 image: {}", err))
    }
}

impl From<gcp_auth::Error> for ArchyError {
    fn from(err: gcp_auth::Error) -> Self {
        Self::FlagStore(format!("Google credentials error: {}", err))
    }
}

/// Result type alias for Archy operations.
pub type Result<T> = std::result::Result<T, ArchyError>;
