//! Session Gate
//!
//! Request-level gate ahead of the admin pages. Unauthenticated
//! requests to `/admin` routes are redirected to the login page with the
//! original path preserved; authenticated requests to the login page are
//! sent to the dashboard. A hop counter header breaks redirect loops:
//! past the cap the request is passed through unauthenticated instead of
//! redirecting forever.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use booking_store::SessionService;

use crate::state::AppState;

pub const REDIRECT_COUNT_HEADER: &str = "x-redirect-count";
pub const SESSION_COOKIE: &str = "sb-access-token";

/// Redirects beyond this count indicate a loop.
const MAX_REDIRECT_HOPS: u32 = 2;

pub async fn session_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let hops = redirect_count(request.headers());
    if hops > MAX_REDIRECT_HOPS {
        tracing::error!(path = %path, hops, "redirect loop detected; passing request through");
        return next.run(request).await;
    }

    let has_session = match cookie_value(request.headers(), SESSION_COOKIE) {
        Some(token) => match state.sessions.get_user(&token).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "session cookie rejected");
                false
            }
        },
        None => false,
    };

    let on_login = path.starts_with("/admin/login");
    let on_reset = path.starts_with("/admin/reset-password");

    if !has_session && path.starts_with("/admin") && !on_login && !on_reset {
        let target = format!("/admin/login?redirected_from={path}");
        return redirect_with_count(&target, hops + 1);
    }

    if has_session && on_login {
        return redirect_with_count("/admin", hops + 1);
    }

    next.run(request).await
}

pub fn redirect_count(headers: &HeaderMap) -> u32 {
    headers
        .get(REDIRECT_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

/// Find a cookie by name in the request's Cookie header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

fn redirect_with_count(target: &str, count: u32) -> Response {
    // Builder only fails on malformed headers, which these are not.
    Response::builder()
        .status(StatusCode::TEMPORARY_REDIRECT)
        .header(header::LOCATION, target)
        .header(REDIRECT_COUNT_HEADER, count.to_string())
        .body(axum::body::Body::empty())
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sb-access-token=jwt-token; other=1"),
        );

        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE).as_deref(),
            Some("jwt-token")
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_redirect_count_defaults_to_zero() {
        let headers = HeaderMap::new();
        assert_eq!(redirect_count(&headers), 0);

        let mut headers = HeaderMap::new();
        headers.insert(REDIRECT_COUNT_HEADER, HeaderValue::from_static("2"));
        assert_eq!(redirect_count(&headers), 2);

        let mut headers = HeaderMap::new();
        headers.insert(REDIRECT_COUNT_HEADER, HeaderValue::from_static("junk"));
        assert_eq!(redirect_count(&headers), 0);
    }

    mod gate {
        use std::sync::Arc;

        use axum::{body::Body, http::Request, middleware, routing::get, Router};
        use tower::ServiceExt;

        use booking_core::MemoryStore;
        use booking_store::AuthUser;

        use super::super::*;
        use crate::handlers::{admin_dashboard, admin_login_page, admin_reset_page};
        use crate::testutil::test_state;

        fn app(user: Option<AuthUser>) -> Router {
            let state = test_state(Arc::new(MemoryStore::new()), user);
            Router::new()
                .route("/admin", get(admin_dashboard))
                .route("/admin/login", get(admin_login_page))
                .route("/admin/reset-password", get(admin_reset_page))
                .route_layer(middleware::from_fn_with_state(state, session_gate))
        }

        fn admin() -> AuthUser {
            AuthUser {
                id: "uid-1".into(),
                email: Some("admin@studio.com".into()),
            }
        }

        fn get_request(path: &str) -> Request<Body> {
            Request::builder().uri(path).body(Body::empty()).unwrap()
        }

        #[tokio::test]
        async fn test_unauthenticated_admin_request_redirects_to_login() {
            let response = app(None).oneshot(get_request("/admin")).await.unwrap();

            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(
                response.headers().get(header::LOCATION).unwrap(),
                "/admin/login?redirected_from=/admin"
            );
            assert_eq!(response.headers().get(REDIRECT_COUNT_HEADER).unwrap(), "1");
        }

        #[tokio::test]
        async fn test_loop_breaker_passes_request_through() {
            // Third hop: give up redirecting and serve the page
            // unauthenticated rather than looping forever.
            let request = Request::builder()
                .uri("/admin")
                .header(REDIRECT_COUNT_HEADER, "3")
                .body(Body::empty())
                .unwrap();

            let response = app(None).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn test_login_and_reset_pages_skip_the_gate() {
            for path in ["/admin/login", "/admin/reset-password"] {
                let response = app(None).oneshot(get_request(path)).await.unwrap();
                assert_eq!(response.status(), StatusCode::OK, "path: {path}");
            }
        }

        #[tokio::test]
        async fn test_authenticated_login_request_redirects_to_dashboard() {
            let request = Request::builder()
                .uri("/admin/login")
                .header(header::COOKIE, format!("{SESSION_COOKIE}=jwt"))
                .body(Body::empty())
                .unwrap();

            let response = app(Some(admin())).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/admin");
        }

        #[tokio::test]
        async fn test_authenticated_admin_request_passes() {
            let request = Request::builder()
                .uri("/admin")
                .header(header::COOKIE, format!("{SESSION_COOKIE}=jwt"))
                .body(Body::empty())
                .unwrap();

            let response = app(Some(admin())).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn test_rejected_token_still_redirects() {
            // Cookie present but the session service rejects it.
            let request = Request::builder()
                .uri("/admin")
                .header(header::COOKIE, format!("{SESSION_COOKIE}=stale"))
                .body(Body::empty())
                .unwrap();

            let response = app(None).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        }
    }
}
