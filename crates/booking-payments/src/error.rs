//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Intent was created but came back without a client secret
    #[error("Payment intent has no client secret")]
    MissingClientSecret,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::Stripe(_) | PaymentError::MissingClientSecret => {
                "Payment processing failed. Please try again."
            }
            PaymentError::Config(_) => "Service configuration error.",
        }
    }
}
