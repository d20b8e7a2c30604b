//! Error Types

use thiserror::Error;

/// Result type alias for booking operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Booking flow error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Form input rejected before any side effect
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record store (Supabase/PostgREST) failure
    #[error("Record store error: {0}")]
    Store(String),

    /// Payment processor (Stripe) failure
    #[error("Payment processor error: {0}")]
    Payment(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Convert to a user-facing message.
    ///
    /// Validation and payment messages are safe to show as-is; store and
    /// config details are logged at the boundary and replaced with a
    /// generic message here.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Validation(msg) | CoreError::Payment(msg) => msg.clone(),
            CoreError::Store(_) | CoreError::NotFound(_) => {
                "Failed to submit booking. Please try again.".into()
            }
            CoreError::Config(_) => "Server configuration error.".into(),
        }
    }
}
