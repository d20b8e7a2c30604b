//! Application Configuration
//!
//! All environment values are read exactly once at startup into an
//! immutable struct. A missing required value fails the process here,
//! naming the variable, rather than surfacing per-request.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Immutable process configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Supabase project URL
    pub supabase_url: String,
    /// Anon key, used by the auth (GoTrue) client
    pub supabase_anon_key: String,
    /// Service-role key, used by the record-store client
    pub supabase_service_key: String,
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Stripe publishable key, exposed to the booking form
    pub stripe_publishable_key: String,
    /// Listen address
    pub bind_addr: String,
    /// Public origin, used for password-reset redirect links
    pub site_url: String,
}

impl AppConfig {
    /// Load from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary lookup (testable without touching the
    /// process environment).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name: &'static str| {
            get(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            supabase_url: require("SUPABASE_URL")?,
            supabase_anon_key: require("SUPABASE_ANON_KEY")?,
            supabase_service_key: require("SUPABASE_SERVICE_ROLE_KEY")?,
            stripe_secret_key: require("STRIPE_SECRET_KEY")?,
            stripe_publishable_key: require("STRIPE_PUBLISHABLE_KEY")?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            site_url: get("SITE_URL").unwrap_or_else(|| "http://localhost:3000".into()),
        })
    }
}
