//! Stripe Deposit Gateway
//!
//! Implements `DepositGateway` with a Stripe payment intent per booking.

use std::collections::HashMap;

use async_trait::async_trait;
use stripe::{
    Client, CreatePaymentIntent, CreatePaymentIntentAutomaticPaymentMethods, Currency,
    PaymentIntent,
};

use booking_core::{CoreError, DepositGateway, DepositIntent, ValidatedBooking, DEPOSIT_USD};

use crate::error::{PaymentError, Result};

/// Description is truncated to this length in intent metadata (Stripe
/// caps metadata values at 500 characters).
const METADATA_DESCRIPTION_LIMIT: usize = 500;

/// Deposit amount in minor units (cents).
pub fn deposit_amount_cents() -> i64 {
    DEPOSIT_USD * 100
}

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        Ok(Self::new(&secret_key))
    }

    /// Booking details attached to the intent for dashboard visibility.
    fn metadata(booking: &ValidatedBooking) -> HashMap<String, String> {
        let mut metadata = HashMap::new();
        metadata.insert("firstName".to_string(), booking.first_name.clone());
        metadata.insert("lastName".to_string(), booking.last_name.clone());
        metadata.insert("email".to_string(), booking.email.clone());
        metadata.insert("phone".to_string(), booking.phone.clone());
        metadata.insert("tattooType".to_string(), booking.category.to_string());
        metadata.insert(
            "description".to_string(),
            truncate_chars(&booking.description, METADATA_DESCRIPTION_LIMIT),
        );
        metadata.insert("depositAmount".to_string(), DEPOSIT_USD.to_string());
        metadata
    }
}

#[async_trait]
impl DepositGateway for StripeGateway {
    async fn create_deposit(&self, booking: &ValidatedBooking) -> booking_core::Result<DepositIntent> {
        let amount = deposit_amount_cents();

        let mut params = CreatePaymentIntent::new(amount, Currency::USD);
        params.receipt_email = Some(booking.email.as_str());
        params.metadata = Some(Self::metadata(booking));
        params.automatic_payment_methods = Some(CreatePaymentIntentAutomaticPaymentMethods {
            enabled: true,
            ..Default::default()
        });

        let intent = PaymentIntent::create(&self.client, params)
            .await
            .map_err(stripe_failure)?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            tracing::error!(payment_intent = %intent.id, "intent created without client secret");
            CoreError::Payment(PaymentError::MissingClientSecret.user_message().into())
        })?;

        tracing::info!(
            payment_intent = %intent.id,
            amount_cents = amount,
            email = %booking.email,
            "deposit payment intent created"
        );

        Ok(DepositIntent {
            id: intent.id.to_string(),
            client_secret,
            amount_cents: amount,
        })
    }
}

/// Surface Stripe's own message when it has one; the raw error is only
/// logged.
fn stripe_failure(err: stripe::StripeError) -> CoreError {
    tracing::error!(error = %err, "payment intent creation failed");

    let message = match &err {
        stripe::StripeError::Stripe(request_error) => request_error.message.clone(),
        _ => None,
    };

    CoreError::Payment(
        message.unwrap_or_else(|| PaymentError::Stripe(String::new()).user_message().into()),
    )
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_core::TattooCategory;

    fn booking() -> ValidatedBooking {
        ValidatedBooking {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john@x.com".into(),
            phone: "Not provided".into(),
            category: TattooCategory::CoverUp,
            description: "rose".into(),
        }
    }

    #[test]
    fn test_deposit_is_2500_cents() {
        assert_eq!(deposit_amount_cents(), 2500);
    }

    #[test]
    fn test_metadata_carries_booking_details() {
        let metadata = StripeGateway::metadata(&booking());
        assert_eq!(metadata["firstName"], "John");
        assert_eq!(metadata["tattooType"], "cover-up");
        assert_eq!(metadata["depositAmount"], "25");
    }

    #[test]
    fn test_metadata_description_truncated_at_500_chars() {
        let mut b = booking();
        b.description = "é".repeat(600);
        let metadata = StripeGateway::metadata(&b);
        assert_eq!(metadata["description"].chars().count(), 500);
    }
}
