//! # booking-payments
//!
//! Stripe deposit integration for inkbook.
//!
//! ## Flow: Payment Intents (Embedded)
//!
//! The booking form stays on the site; Stripe Elements mounts with a
//! client secret minted here:
//!
//! ```text
//! ┌─────────────┐   create intent   ┌────────┐   client_secret   ┌─────────┐
//! │ booking API │──────────────────▶│ Stripe │──────────────────▶│ browser │
//! └─────────────┘                   └────────┘    confirms pay   └─────────┘
//! ```
//!
//! Every booking carries the same flat deposit regardless of category;
//! the booking details ride along as intent metadata so a charge is
//! identifiable from the Stripe dashboard alone.

mod error;
mod gateway;

pub use error::{PaymentError, Result};
pub use gateway::{deposit_amount_cents, StripeGateway};
