//! Shared fixtures for handler and session-gate tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use booking_core::{
    BookingStatus, BookingStore, DepositGateway, DepositIntent, MemoryStore, NewBooking,
    TattooCategory, ValidatedBooking, DEPOSIT_USD, PHONE_NOT_PROVIDED,
};
use booking_store::{AuthUser, Session, SessionService, StoreError};

use crate::state::AppState;

/// Session service that resolves every token to a fixed user (or none).
pub struct StubSessions {
    user: Option<AuthUser>,
}

#[async_trait]
impl SessionService for StubSessions {
    async fn sign_in(&self, _email: &str, _password: &str) -> booking_store::Result<Session> {
        match &self.user {
            Some(user) => Ok(Session {
                access_token: "jwt".into(),
                refresh_token: "refresh".into(),
                expires_in: 3600,
                user: user.clone(),
            }),
            None => Err(StoreError::Auth("Invalid login credentials".into())),
        }
    }

    async fn get_user(&self, _access_token: &str) -> booking_store::Result<AuthUser> {
        self.user
            .clone()
            .ok_or_else(|| StoreError::Auth("invalid token".into()))
    }

    async fn sign_out(&self, _access_token: &str) -> booking_store::Result<()> {
        Ok(())
    }

    async fn update_password(
        &self,
        _access_token: &str,
        _new_password: &str,
    ) -> booking_store::Result<()> {
        Ok(())
    }

    async fn reset_password_for_email(
        &self,
        _email: &str,
        _redirect_to: &str,
    ) -> booking_store::Result<()> {
        Ok(())
    }
}

/// Gateway that mints a fixed intent.
pub struct NullGateway;

#[async_trait]
impl DepositGateway for NullGateway {
    async fn create_deposit(
        &self,
        _booking: &ValidatedBooking,
    ) -> booking_core::Result<DepositIntent> {
        Ok(DepositIntent {
            id: "pi_test".into(),
            client_secret: "pi_test_secret".into(),
            amount_cents: DEPOSIT_USD * 100,
        })
    }
}

pub fn test_state(store: Arc<MemoryStore>, user: Option<AuthUser>) -> AppState {
    AppState {
        store,
        deposits: Arc::new(NullGateway),
        sessions: Arc::new(StubSessions { user }),
        stripe_publishable_key: "pk_test_x".into(),
        site_url: "http://localhost:3000".into(),
    }
}

/// Insert one booking with the given status; returns its id.
pub async fn seeded_booking(store: &MemoryStore, status: BookingStatus) -> String {
    let record = NewBooking {
        first_name: "John".into(),
        last_name: "Doe".into(),
        email: "john@x.com".into(),
        phone: PHONE_NOT_PROVIDED.into(),
        tattoo_category: TattooCategory::Flash,
        description: "rose".into(),
        payment_intent_id: None,
        preferred_date: Utc::now().date_naive(),
        status: Some(status),
    };
    store.insert(&record).await.expect("seed insert").id
}
