//! Deposit Gateway Port
//!
//! Abstraction over the payment processor. The processor-side payment
//! intent is opaque to the core; only its id, client secret, and amount
//! cross the boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validate::ValidatedBooking;

/// A created payment intent, ready for client-side confirmation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DepositIntent {
    /// Processor-side intent identifier (`pi_...`)
    pub id: String,

    /// Client secret handed to the browser to complete the payment
    pub client_secret: String,

    /// Charged amount in minor units (cents)
    pub amount_cents: i64,
}

/// Payment processor client trait.
///
/// Implement this per processor; the production implementation lives in
/// `booking-payments`.
#[async_trait]
pub trait DepositGateway: Send + Sync {
    /// Create a deposit payment intent for a validated booking.
    ///
    /// The amount is the flat deposit for every category. Booking
    /// details travel as intent metadata so the charge is identifiable
    /// from the processor dashboard alone.
    async fn create_deposit(&self, booking: &ValidatedBooking) -> Result<DepositIntent>;
}
