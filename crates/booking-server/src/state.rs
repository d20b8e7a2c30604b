//! Application State

use std::sync::Arc;

use booking_core::{BookingStore, DepositGateway};
use booking_store::SessionService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Record store (Supabase in production, in-memory in tests)
    pub store: Arc<dyn BookingStore>,

    /// Payment processor gateway
    pub deposits: Arc<dyn DepositGateway>,

    /// Hosted auth service for admin sessions
    pub sessions: Arc<dyn SessionService>,

    /// Publishable key handed to the booking form for Stripe Elements
    pub stripe_publishable_key: String,

    /// Public origin for password-reset redirect links
    pub site_url: String,
}
