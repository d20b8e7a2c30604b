//! # booking-core
//!
//! Domain model and booking-to-payment flow for the inkbook studio backend.
//!
//! A booking moves through a small, forward-only state machine:
//!
//! ```text
//! form submit ──▶ validate ──┬──▶ insert (no status, store default)      free path
//!                            │
//!                            └──▶ deposit intent ──▶ insert              paid path
//!                                 (pending_payment)
//!
//! payment confirmed ──▶ pending ──▶ confirmed | cancelled (admin)
//! ```
//!
//! The record store and payment processor sit behind the [`BookingStore`]
//! and [`DepositGateway`] traits so the flow functions in [`flow`] can be
//! exercised against in-memory fakes.

pub mod deposit;
pub mod error;
pub mod flow;
pub mod model;
pub mod store;
pub mod validate;

pub use deposit::{DepositGateway, DepositIntent};
pub use error::{CoreError, Result};
pub use model::{
    Booking, BookingStatus, NewBooking, TattooCategory, DEPOSIT_USD, PHONE_NOT_PROVIDED,
};
pub use store::{BookingStore, MemoryStore};
pub use validate::{validate_booking, BookingForm, ValidatedBooking};
