//! GoTrue Session Service
//!
//! Admin login, token verification, and password management against the
//! hosted auth service. Session cookies themselves are the HTTP layer's
//! concern; this client only exchanges and validates tokens.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Authenticated user identity resolved from an access token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session as returned by the password grant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    pub user: AuthUser,
}

/// Session service trait (hosted auth collaborator).
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Exchange email/password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Resolve the user behind an access token; fails on an invalid or
    /// expired token.
    async fn get_user(&self, access_token: &str) -> Result<AuthUser>;

    /// Revoke a session.
    async fn sign_out(&self, access_token: &str) -> Result<()>;

    /// Change the signed-in user's password.
    async fn update_password(&self, access_token: &str, new_password: &str) -> Result<()>;

    /// Send a password-reset email with a redirect target.
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<()>;
}

/// GoTrue REST client (`{base}/auth/v1`).
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    /// GoTrue error bodies vary (`error_description`, `msg`, `message`);
    /// pick whichever is present.
    fn auth_message(body: &str) -> String {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        parsed
            .as_ref()
            .and_then(|v| {
                v.get("error_description")
                    .or_else(|| v.get("msg"))
                    .or_else(|| v.get("message"))
            })
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| "authentication request rejected".to_string(), String::from)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::BAD_REQUEST
        {
            Err(StoreError::Auth(Self::auth_message(&body)))
        } else {
            Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

#[async_trait]
impl SessionService for AuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .http
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = Self::check(response).await?;
        let session: Session = response.json().await?;
        tracing::info!(user_id = %session.user.id, "admin signed in");
        Ok(session)
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let response = self
            .http
            .get(self.url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .post(self.url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn update_password(&self, access_token: &str, new_password: &str) -> Result<()> {
        let response = self
            .http
            .put(self.url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "password": new_password }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<()> {
        let mut request = self
            .http
            .post(self.url("recover"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email }));

        if !redirect_to.is_empty() {
            request = request.query(&[("redirect_to", redirect_to)]);
        }

        Self::check(request.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = AuthClient::new("https://proj.supabase.co/", "anon");
        assert_eq!(client.url("user"), "https://proj.supabase.co/auth/v1/user");
    }

    #[test]
    fn test_auth_message_shapes() {
        assert_eq!(
            AuthClient::auth_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            AuthClient::auth_message(r#"{"msg":"Invalid token"}"#),
            "Invalid token"
        );
        assert_eq!(AuthClient::auth_message("not json"), "authentication request rejected");
    }

    #[test]
    fn test_session_decodes_password_grant_response() {
        let body = serde_json::json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": { "id": "uid-1", "email": "admin@studio.com" }
        });

        let session: Session = serde_json::from_value(body).unwrap();
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.email.as_deref(), Some("admin@studio.com"));
    }
}
