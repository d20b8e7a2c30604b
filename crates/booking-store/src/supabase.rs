//! Supabase Record Store
//!
//! `BookingStore` implementation over PostgREST (`{base}/rest/v1`),
//! using the service-role key. Tables consumed: `bookings`,
//! `admin_users` (allow-list), and `user_roles` (admin flag).

use async_trait::async_trait;
use serde::Deserialize;

use booking_core::{Booking, BookingStatus, BookingStore, CoreError, NewBooking};

use crate::error::{Result, StoreError};

/// PostgREST client bound to the service-role key.
pub struct SupabaseStore {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.table_url(table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn insert_row(&self, booking: &NewBooking) -> Result<Booking> {
        let response = self
            .request(reqwest::Method::POST, "bookings")
            .header("Prefer", "return=representation")
            .json(booking)
            .send()
            .await?;

        let response = Self::check(response).await?;
        let mut rows: Vec<Booking> = response.json().await?;
        rows.pop()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".into()))
    }

    async fn select_by_payment_intent(&self, payment_intent_id: &str) -> Result<Option<Booking>> {
        // ilike with no wildcards: exact match, case-insensitive.
        let filter = format!("ilike.{payment_intent_id}");
        let response = self
            .request(reqwest::Method::GET, "bookings")
            .query(&[
                ("select", "*"),
                ("payment_intent_id", filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let response = Self::check(response).await?;
        let mut rows: Vec<Booking> = response.json().await?;
        Ok(rows.pop())
    }

    async fn patch_status(&self, id: &str, status: BookingStatus) -> Result<()> {
        let response = self
            .request(reqwest::Method::PATCH, "bookings")
            .query(&[("id", &format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<Booking>> {
        let response = self
            .request(reqwest::Method::GET, "bookings")
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn select_allowlisted(&self, email: &str) -> Result<bool> {
        let filter = format!("eq.{email}");
        let response = self
            .request(reqwest::Method::GET, "admin_users")
            .query(&[
                ("select", "email"),
                ("email", filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let response = Self::check(response).await?;
        let rows: Vec<serde_json::Value> = response.json().await?;
        Ok(!rows.is_empty())
    }

    async fn select_admin_flag(&self, user_id: &str) -> Result<bool> {
        #[derive(Deserialize)]
        struct RoleRow {
            #[serde(default)]
            is_admin: bool,
        }

        let filter = format!("eq.{user_id}");
        let response = self
            .request(reqwest::Method::GET, "user_roles")
            .query(&[
                ("select", "is_admin"),
                ("user_id", filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let response = Self::check(response).await?;
        let rows: Vec<RoleRow> = response.json().await?;
        Ok(rows.first().is_some_and(|row| row.is_admin))
    }
}

/// Full detail is logged here; the flow layer only sees a generic store
/// error.
fn into_core(err: StoreError) -> CoreError {
    tracing::error!(error = %err, "supabase request failed");
    CoreError::Store(err.to_string())
}

#[async_trait]
impl BookingStore for SupabaseStore {
    async fn insert(&self, booking: &NewBooking) -> booking_core::Result<Booking> {
        self.insert_row(booking).await.map_err(into_core)
    }

    async fn find_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> booking_core::Result<Option<Booking>> {
        self.select_by_payment_intent(payment_intent_id)
            .await
            .map_err(into_core)
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> booking_core::Result<()> {
        self.patch_status(id, status).await.map_err(into_core)
    }

    async fn list_all(&self) -> booking_core::Result<Vec<Booking>> {
        self.select_all().await.map_err(into_core)
    }

    async fn allowlist_contains(&self, email: &str) -> booking_core::Result<bool> {
        self.select_allowlisted(email).await.map_err(into_core)
    }

    async fn is_admin(&self, user_id: &str) -> booking_core::Result<bool> {
        self.select_admin_flag(user_id).await.map_err(into_core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let store = SupabaseStore::new("https://proj.supabase.co/", "key");
        assert_eq!(
            store.table_url("bookings"),
            "https://proj.supabase.co/rest/v1/bookings"
        );
    }

    #[test]
    fn test_postgrest_rows_decode() {
        let body = serde_json::json!([{
            "id": 7,
            "first_name": "John",
            "last_name": "Doe",
            "email": "john@x.com",
            "phone": "Not provided",
            "tattoo_type": "consultation",
            "description": "sleeve consult",
            "payment_intent_id": "pi_123",
            "preferred_date": "2026-08-30",
            "created_at": "2026-08-30T09:30:00+00:00",
            "status": "pending_payment"
        }]);

        let rows: Vec<Booking> = serde_json::from_value(body).unwrap();
        assert_eq!(rows[0].id, "7");
        assert_eq!(rows[0].status, Some(BookingStatus::PendingPayment));
        assert_eq!(rows[0].payment_intent_id.as_deref(), Some("pi_123"));
    }
}
