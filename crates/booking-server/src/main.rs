//! inkbook HTTP Server
//!
//! Axum-based server for the booking and deposit API: public booking
//! submission, the Stripe deposit flow, and the bearer-token-protected
//! admin endpoints, with a session gate ahead of the admin pages.

mod config;
mod handlers;
mod session;
mod state;
#[cfg(test)]
mod testutil;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booking_payments::StripeGateway;
use booking_store::{AuthClient, SupabaseStore};

use crate::config::AppConfig;
use crate::handlers::{
    admin_dashboard, admin_login_page, admin_reset_page, booking_confirmation, change_password,
    confirm_payment, create_deposit, health_check, list_bookings, login, logout, payments_config,
    reset_password, submit_booking, update_status,
};
use crate::session::session_gate;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // All configuration is read once, up front. A missing credential
    // stops the process here instead of failing per-request.
    let config = AppConfig::from_env()?;
    tracing::info!("✓ Configuration loaded");

    let store = Arc::new(SupabaseStore::new(
        &config.supabase_url,
        &config.supabase_service_key,
    ));
    let sessions = Arc::new(AuthClient::new(
        &config.supabase_url,
        &config.supabase_anon_key,
    ));
    let deposits = Arc::new(StripeGateway::new(&config.stripe_secret_key));
    tracing::info!("✓ Supabase and Stripe clients ready");

    // Build application state
    let state = AppState {
        store,
        deposits,
        sessions,
        stripe_publishable_key: config.stripe_publishable_key.clone(),
        site_url: config.site_url.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Admin pages sit behind the session gate; the /api/admin routes
    // authenticate per-request with bearer tokens instead.
    let admin_pages = Router::new()
        .route("/admin", get(admin_dashboard))
        .route("/admin/login", get(admin_login_page))
        .route("/admin/reset-password", get(admin_reset_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_gate));

    // Build router
    let app = Router::new()
        // Health & info
        .route("/health", get(health_check))
        // Booking API
        .route("/api/bookings", post(submit_booking))
        // Payments
        .route("/api/payments/deposit", post(create_deposit))
        .route("/api/payments/config", get(payments_config))
        .route("/payment/confirm", get(confirm_payment))
        .route("/booking-confirmation", get(booking_confirmation))
        // Admin API
        .route("/api/admin/bookings", get(list_bookings))
        .route("/api/admin/update-status", post(update_status))
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
        .route("/api/admin/reset-password", post(reset_password))
        .route("/api/admin/change-password", post(change_password))
        .merge(admin_pages)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("🚀 inkbook server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                    - Health check");
    tracing::info!("  POST /api/bookings              - Submit booking (no deposit)");
    tracing::info!("  POST /api/payments/deposit      - Create deposit intent + booking");
    tracing::info!("  GET  /payment/confirm           - Payment confirmation redirect");
    tracing::info!("  GET  /api/admin/bookings        - List bookings (bearer token)");
    tracing::info!("  POST /api/admin/update-status   - Update booking status (admin)");

    axum::serve(listener, app).await?;

    Ok(())
}
