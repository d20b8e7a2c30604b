//! Booking Store Port
//!
//! Repository-style interface over the record store, plus an in-memory
//! implementation for development and tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{CoreError, Result};
use crate::model::{Booking, BookingStatus, NewBooking};

/// Record store trait.
///
/// One table of booking records plus the two small admin tables the
/// gateway consults. Row-level atomicity is the store's concern;
/// concurrent status updates are last-writer-wins.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert a new booking record, returning the stored row.
    async fn insert(&self, booking: &NewBooking) -> Result<Booking>;

    /// Find the single booking linked to a payment intent
    /// (case-insensitive exact match, limit one).
    async fn find_by_payment_intent(&self, payment_intent_id: &str) -> Result<Option<Booking>>;

    /// Update one record's status by id.
    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<()>;

    /// All booking records, newest first.
    async fn list_all(&self) -> Result<Vec<Booking>>;

    /// Whether an email is on the admin allow-list.
    async fn allowlist_contains(&self, email: &str) -> Result<bool>;

    /// Whether a user id carries the admin flag in the roles table.
    async fn is_admin(&self, user_id: &str) -> Result<bool>;
}

/// In-memory booking store (for development and tests).
///
/// Supports failure injection so flow tests can exercise the
/// partial-failure paths.
pub struct MemoryStore {
    bookings: RwLock<Vec<Booking>>,
    allowlist: RwLock<HashSet<String>>,
    admins: RwLock<HashSet<String>>,
    fail_inserts: AtomicBool,
    fail_updates: AtomicBool,
    fail_allowlist: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            bookings: RwLock::new(Vec::new()),
            allowlist: RwLock::new(HashSet::new()),
            admins: RwLock::new(HashSet::new()),
            fail_inserts: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            fail_allowlist: AtomicBool::new(false),
        }
    }

    /// Add an email to the admin allow-list.
    pub fn allow_email(&self, email: &str) {
        self.allowlist.write().unwrap().insert(email.to_string());
    }

    /// Grant the admin flag to a user id.
    pub fn grant_admin(&self, user_id: &str) {
        self.admins.write().unwrap().insert(user_id.to_string());
    }

    /// Make subsequent inserts fail.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent status updates fail.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make allow-list lookups fail.
    pub fn fail_allowlist(&self, fail: bool) {
        self.fail_allowlist.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all stored bookings, insertion order.
    pub fn all(&self) -> Vec<Booking> {
        self.bookings.read().unwrap().clone()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert(&self, booking: &NewBooking) -> Result<Booking> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(CoreError::Store("injected insert failure".into()));
        }

        let stored = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: booking.first_name.clone(),
            last_name: booking.last_name.clone(),
            email: booking.email.clone(),
            phone: booking.phone.clone(),
            tattoo_category: booking.tattoo_category,
            description: booking.description.clone(),
            payment_intent_id: booking.payment_intent_id.clone(),
            preferred_date: booking.preferred_date,
            created_at: Some(Utc::now()),
            status: booking.status,
        };

        self.bookings.write().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_payment_intent(&self, payment_intent_id: &str) -> Result<Option<Booking>> {
        let bookings = self.bookings.read().unwrap();
        Ok(bookings
            .iter()
            .find(|b| {
                b.payment_intent_id
                    .as_deref()
                    .is_some_and(|id| id.eq_ignore_ascii_case(payment_intent_id))
            })
            .cloned())
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(CoreError::Store("injected update failure".into()));
        }

        // Like PostgREST, a PATCH matching no rows is not an error.
        let mut bookings = self.bookings.write().unwrap();
        if let Some(booking) = bookings.iter_mut().find(|b| b.id == id) {
            booking.status = Some(status);
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Booking>> {
        let mut bookings = self.bookings.read().unwrap().clone();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn allowlist_contains(&self, email: &str) -> Result<bool> {
        if self.fail_allowlist.load(Ordering::SeqCst) {
            return Err(CoreError::Store("injected allow-list failure".into()));
        }
        Ok(self.allowlist.read().unwrap().contains(email))
    }

    async fn is_admin(&self, user_id: &str) -> Result<bool> {
        Ok(self.admins.read().unwrap().contains(user_id))
    }
}
