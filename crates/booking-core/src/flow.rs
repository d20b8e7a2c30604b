//! Booking-to-Payment Flow
//!
//! The three operations that move a submission through the state
//! machine. Validation always runs first; nothing is written on a
//! validation failure.
//!
//! The paid path touches two external systems and is not transactional
//! across them: if the record insert fails after the intent was created,
//! the failure is surfaced to the caller and the processor-side intent
//! is left orphaned. That window is accepted and logged, never hidden.

use chrono::Utc;

use crate::deposit::{DepositGateway, DepositIntent};
use crate::error::Result;
use crate::model::{BookingStatus, NewBooking};
use crate::store::BookingStore;
use crate::validate::{validate_booking, BookingForm, ValidatedBooking};

/// Free path: validate and insert with the store's default status.
pub async fn submit_booking(
    store: &dyn BookingStore,
    form: &BookingForm,
) -> Result<crate::model::Booking> {
    let booking = validate_booking(form)?;

    let record = plain_record(&booking);
    let stored = store.insert(&record).await?;

    tracing::info!(booking_id = %stored.id, email = %stored.email, "booking submitted");
    Ok(stored)
}

/// Paid path: create the deposit intent, then insert a
/// `pending_payment` record linked to it.
///
/// If intent creation fails no record is written. If the insert fails
/// after the intent exists, the error is returned (no silent success)
/// and the intent is not rolled back.
pub async fn begin_deposit(
    store: &dyn BookingStore,
    gateway: &dyn DepositGateway,
    form: &BookingForm,
) -> Result<DepositIntent> {
    let booking = validate_booking(form)?;

    let intent = gateway.create_deposit(&booking).await?;

    let record = deposit_record(&booking, &intent);
    if let Err(e) = store.insert(&record).await {
        tracing::error!(
            payment_intent = %intent.id,
            error = %e,
            "booking insert failed after intent creation; intent left orphaned"
        );
        return Err(e);
    }

    tracing::info!(
        payment_intent = %intent.id,
        amount_cents = intent.amount_cents,
        "deposit intent created and booking recorded"
    );
    Ok(intent)
}

/// Payment confirmed upstream: mark the linked booking `pending`.
///
/// This never fails the caller. The payment already succeeded, so a
/// missing or un-updatable record is an operational follow-up, not a
/// user-facing error; the HTTP layer redirects to the confirmation page
/// regardless.
pub async fn confirm_deposit(store: &dyn BookingStore, payment_intent_id: &str) {
    let booking = match store.find_by_payment_intent(payment_intent_id).await {
        Ok(Some(booking)) => booking,
        Ok(None) => {
            tracing::error!(
                payment_intent = %payment_intent_id,
                "no booking found for confirmed payment; manual reconciliation needed"
            );
            return;
        }
        Err(e) => {
            tracing::error!(
                payment_intent = %payment_intent_id,
                error = %e,
                "booking lookup failed for confirmed payment"
            );
            return;
        }
    };

    // Only move forward; a booking already past pending_payment stays put.
    let allowed = booking
        .status
        .is_none_or(|s| s.can_transition_to(BookingStatus::Pending));
    if !allowed {
        tracing::warn!(
            booking_id = %booking.id,
            status = ?booking.status,
            "booking already past pending_payment; leaving status unchanged"
        );
        return;
    }

    if let Err(e) = store.update_status(&booking.id, BookingStatus::Pending).await {
        tracing::error!(
            booking_id = %booking.id,
            error = %e,
            "failed to mark booking pending after payment"
        );
    }
}

fn plain_record(booking: &ValidatedBooking) -> NewBooking {
    NewBooking {
        first_name: booking.first_name.clone(),
        last_name: booking.last_name.clone(),
        email: booking.email.clone(),
        phone: booking.phone.clone(),
        tattoo_category: booking.category,
        description: booking.description.clone(),
        payment_intent_id: None,
        preferred_date: Utc::now().date_naive(),
        status: None,
    }
}

fn deposit_record(booking: &ValidatedBooking, intent: &DepositIntent) -> NewBooking {
    let mut record = plain_record(booking);
    record.description = describe_with_payment(&booking.description, intent);
    record.payment_intent_id = Some(intent.id.clone());
    record.status = Some(BookingStatus::PendingPayment);
    record
}

/// Append a human-readable payment block so the intent id stays
/// discoverable from the record itself.
fn describe_with_payment(description: &str, intent: &DepositIntent) -> String {
    format!(
        "{description}\n\n--- Payment Info ---\nPayment Intent ID: {}\nDeposit Amount: ${}",
        intent.id,
        intent.amount_cents / 100
    )
}
