//! Store Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

/// Supabase client errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from PostgREST
    #[error("Supabase API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Missing, invalid, or expired credentials/token
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response body did not match the expected shape
    #[error("Response decode error: {0}")]
    Decode(String),
}

impl StoreError {
    /// Whether this is an auth failure (401-style) rather than a
    /// service problem.
    pub fn is_auth(&self) -> bool {
        matches!(self, StoreError::Auth(_))
    }
}
