//! HTTP Handlers

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};

use booking_core::{flow, Booking, BookingForm, BookingStatus, BookingStore, CoreError, DEPOSIT_USD};
use booking_store::SessionService;

use crate::session::SESSION_COOKIE;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DepositResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    /// Stripe appends `payment_intent` to the return URL
    #[serde(default)]
    pub payment_intent: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentsConfigResponse {
    pub publishable_key: String,
    pub deposit_amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

// ============================================================================
// Public Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Free-path booking submission (no deposit).
pub async fn submit_booking(
    State(state): State<AppState>,
    Json(form): Json<BookingForm>,
) -> (StatusCode, Json<SubmitResponse>) {
    match flow::submit_booking(state.store.as_ref(), &form).await {
        Ok(_) => (
            StatusCode::OK,
            Json(SubmitResponse {
                success: true,
                message: "Booking submitted successfully!".into(),
            }),
        ),
        Err(e @ CoreError::Validation(_)) => (
            StatusCode::OK,
            Json(SubmitResponse {
                success: false,
                message: e.user_message(),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "booking submission failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitResponse {
                    success: false,
                    message: "Failed to submit booking. Please try again.".into(),
                }),
            )
        }
    }
}

/// Paid path: create the deposit intent and the linked
/// `pending_payment` booking, returning the client secret for Stripe
/// Elements.
pub async fn create_deposit(
    State(state): State<AppState>,
    Json(form): Json<BookingForm>,
) -> (StatusCode, Json<DepositResponse>) {
    match flow::begin_deposit(state.store.as_ref(), state.deposits.as_ref(), &form).await {
        Ok(intent) => (
            StatusCode::OK,
            Json(DepositResponse {
                success: true,
                client_secret: Some(intent.client_secret),
                payment_intent_id: Some(intent.id),
                deposit_amount: Some(DEPOSIT_USD),
                message: None,
            }),
        ),
        Err(e @ CoreError::Validation(_)) => (
            StatusCode::OK,
            Json(DepositResponse {
                success: false,
                client_secret: None,
                payment_intent_id: None,
                deposit_amount: None,
                message: Some(e.user_message()),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "deposit creation failed");
            let message = match &e {
                CoreError::Payment(_) => e.user_message(),
                _ => "Failed to create booking. Please try again.".into(),
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DepositResponse {
                    success: false,
                    client_secret: None,
                    payment_intent_id: None,
                    deposit_amount: None,
                    message: Some(message),
                }),
            )
        }
    }
}

/// Publishable configuration for the booking form.
pub async fn payments_config(State(state): State<AppState>) -> Json<PaymentsConfigResponse> {
    Json(PaymentsConfigResponse {
        publishable_key: state.stripe_publishable_key.clone(),
        deposit_amount: DEPOSIT_USD,
    })
}

/// Payment confirmation return URL.
///
/// The payment already succeeded processor-side, so this always sends
/// the customer to the confirmation page; reconciliation problems are
/// logged, never shown.
pub async fn confirm_payment(
    State(state): State<AppState>,
    Query(params): Query<ConfirmParams>,
) -> Redirect {
    match params.payment_intent.as_deref() {
        Some(payment_intent_id) => {
            flow::confirm_deposit(state.store.as_ref(), payment_intent_id).await;
        }
        None => {
            tracing::warn!("payment confirmation called without a payment_intent parameter");
        }
    }
    Redirect::to("/booking-confirmation")
}

/// Confirmation page shown after a successful deposit.
pub async fn booking_confirmation() -> Html<&'static str> {
    Html(
        "<h1>Booking received</h1>\
         <p>Thanks! Your deposit has been received and your booking request \
         is in review. We'll reach out by email to schedule your session.</p>",
    )
}

// ============================================================================
// Admin Handlers
// ============================================================================

/// List all bookings, newest first. Requires a bearer token belonging
/// to an allow-listed admin email. The allow-list check fails closed:
/// any lookup error denies access.
pub async fn list_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        api_error(StatusCode::UNAUTHORIZED, "Unauthorized", "MISSING_TOKEN")
    })?;

    let user = state.sessions.get_user(token).await.map_err(|e| {
        tracing::warn!(error = %e, "token verification failed");
        api_error(StatusCode::UNAUTHORIZED, "Unauthorized", "INVALID_TOKEN")
    })?;

    let email = user.email.ok_or_else(|| {
        api_error(
            StatusCode::UNAUTHORIZED,
            "Unauthorized - Invalid user",
            "INVALID_USER",
        )
    })?;

    match state.store.allowlist_contains(&email).await {
        Ok(true) => {}
        Ok(false) => {
            return Err(api_error(
                StatusCode::FORBIDDEN,
                "Unauthorized - Not an admin",
                "NOT_ADMIN",
            ));
        }
        Err(e) => {
            tracing::error!(error = %e, "allow-list lookup failed; denying access");
            return Err(api_error(
                StatusCode::FORBIDDEN,
                "Unauthorized - Not an admin",
                "ALLOWLIST_UNAVAILABLE",
            ));
        }
    }

    let bookings = state.store.list_all().await.map_err(|e| {
        tracing::error!(error = %e, "failed to fetch bookings");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch bookings",
            "STORE_ERROR",
        )
    })?;

    Ok(Json(bookings))
}

/// Update one booking's status. Stricter than the list endpoint: the
/// resolved user must carry the admin flag in the roles table, with no
/// fallback.
pub async fn update_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        api_error(StatusCode::UNAUTHORIZED, "Unauthorized", "MISSING_TOKEN")
    })?;

    let user = state.sessions.get_user(token).await.map_err(|e| {
        tracing::warn!(error = %e, "token verification failed");
        api_error(StatusCode::UNAUTHORIZED, "Unauthorized", "INVALID_TOKEN")
    })?;

    let is_admin = state.store.is_admin(&user.id).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "roles lookup failed; denying access");
        false
    });
    if !is_admin {
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "Unauthorized - Not an admin",
            "NOT_ADMIN",
        ));
    }

    let (Some(id), Some(status)) = (payload.id.as_deref(), payload.status.as_deref()) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Missing required fields",
            "MISSING_FIELDS",
        ));
    };

    let status = BookingStatus::parse(status).ok_or_else(|| {
        api_error(StatusCode::BAD_REQUEST, "Invalid status value", "INVALID_STATUS")
    })?;

    state.store.update_status(id, status).await.map_err(|e| {
        tracing::error!(error = %e, booking_id = %id, "status update failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update booking status",
            "UPDATE_FAILED",
        )
    })?;

    tracing::info!(booking_id = %id, status = %status, admin = %user.id, "booking status updated");
    Ok(Json(UpdateStatusResponse { success: true }))
}

// ============================================================================
// Admin Auth Handlers
// ============================================================================

/// Sign in and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sessions
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "admin sign-in failed");
            api_error(
                StatusCode::UNAUTHORIZED,
                "Invalid login credentials",
                "INVALID_CREDENTIALS",
            )
        })?;

    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        session.access_token, session.expires_in
    );

    Ok(([(header::SET_COOKIE, cookie)], Json(session)))
}

/// Revoke the session (best effort) and clear the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let token = bearer_token(&headers)
        .map(String::from)
        .or_else(|| crate::session::cookie_value(&headers, SESSION_COOKIE));

    if let Some(token) = token {
        if let Err(e) = state.sessions.sign_out(&token).await {
            tracing::warn!(error = %e, "sign-out call failed");
        }
    }

    let clear = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    (
        [(header::SET_COOKIE, clear)],
        Json(UpdateStatusResponse { success: true }),
    )
}

/// Send a password-reset email pointing back at the reset page.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let redirect_to = format!("{}/admin/reset-password", state.site_url);

    state
        .sessions
        .reset_password_for_email(&payload.email, &redirect_to)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password reset request failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send reset email",
                "AUTH_ERROR",
            )
        })?;

    Ok(Json(UpdateStatusResponse { success: true }))
}

/// Change the signed-in admin's password.
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        api_error(StatusCode::UNAUTHORIZED, "Unauthorized", "MISSING_TOKEN")
    })?;

    state
        .sessions
        .update_password(token, &payload.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "password change failed");
            if e.is_auth() {
                api_error(StatusCode::UNAUTHORIZED, "Unauthorized", "INVALID_TOKEN")
            } else {
                api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to change password",
                    "AUTH_ERROR",
                )
            }
        })?;

    Ok(Json(UpdateStatusResponse { success: true }))
}

// ============================================================================
// Admin Pages (placeholders behind the session gate)
// ============================================================================

pub async fn admin_dashboard() -> Html<&'static str> {
    Html("<h1>Bookings</h1><p>Loading booking requests…</p>")
}

pub async fn admin_login_page() -> Html<&'static str> {
    Html("<h1>Admin login</h1>")
}

pub async fn admin_reset_page() -> Html<&'static str> {
    Html("<h1>Reset password</h1>")
}
