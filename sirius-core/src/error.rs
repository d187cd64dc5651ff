//! Error types for Sirius
//!
//! Provides a unified error type for all Sirius client operations.

use thiserror::Error;

/// Result type alias for Sirius operations
pub type Result<T> = std::result::Result<T, SiriusError>;

/// Unified error type for Sirius
#[derive(Error, Debug)]
pub enum SiriusError {
    // ===== Configuration Errors =====
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ===== Validation Errors =====
    #[error("Chunk size too large: {size} bytes (must be less than {max})")]
    ChunkSizeTooLarge { size: usize, max: usize },

    #[error("Chunk size must be greater than zero")]
    ChunkSizeZero,

    #[error("Invalid metadata value for '{key}': {reason}")]
    InvalidMetadata { key: &'static str, reason: String },

    // ===== Transport Errors =====
    #[error("RPC failed: {0}")]
    Transport(#[from] tonic::Status),

    #[error("Connection failed: {0}")]
    Connect(String),

    // ===== Response Shape Errors =====
    #[error("Malformed response: {0}")]
    Shape(String),

    // ===== REST Errors =====
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    // ===== I/O Errors =====
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiriusError {
    /// True for errors raised by local argument checks before any network activity
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SiriusError::ChunkSizeTooLarge { .. }
                | SiriusError::ChunkSizeZero
                | SiriusError::InvalidMetadata { .. }
        )
    }

    /// True for failures reported by, or while talking to, the remote service
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SiriusError::Transport(_) | SiriusError::Connect(_) | SiriusError::Shape(_)
        )
    }

    /// gRPC status code, when the error came from a call
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            SiriusError::Transport(status) => Some(status.code()),
            _ => None,
        }
    }
}

impl From<tonic::transport::Error> for SiriusError {
    fn from(err: tonic::transport::Error) -> Self {
        SiriusError::Connect(err.to_string())
    }
}
