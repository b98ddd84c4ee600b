//! Custom error types for keyseal
//!
//! Every internal step returns a distinguishable [`SealError`]; only the
//! fail-closed string API in [`crate::sealer`] collapses them to `""`.

use thiserror::Error;

/// The main error type for keyseal operations
#[derive(Error, Debug)]
pub enum SealError {
    /// A required secret is missing or empty
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wrong segment count, empty segment, invalid hex or bad field length
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Padding or key mismatch, or undecodable plaintext
    #[error("Cipher error: {0}")]
    Cipher(String),

    /// The operating system random source failed
    #[error("Random source error: {0}")]
    Random(String),

    /// PBKDF2 parameters were rejected
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Requested keys absent from an env file
    #[error("Missing required variables: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

impl SealError {
    /// Stable short name of the error kind, safe to log
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::MalformedEnvelope(_) => "malformed_envelope",
            Self::Cipher(_) => "cipher",
            Self::Random(_) => "random",
            Self::KeyDerivation(_) => "key_derivation",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Storage(_) => "storage",
            Self::MissingKeys(_) => "missing_keys",
        }
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a malformed envelope error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedEnvelope(_))
    }

    /// Check if this is a cipher error
    pub fn is_cipher(&self) -> bool {
        matches!(self, Self::Cipher(_))
    }
}

impl From<std::io::Error> for SealError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for keyseal operations
pub type SealResult<T> = Result<T, SealError>;
