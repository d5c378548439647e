//! Error types for the ToastSpeech application

use thiserror::Error;

/// Bearer token errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Bad signature, malformed token, expired token or empty subject.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),
}
