//! # booking-store
//!
//! Supabase integration for inkbook: a PostgREST client implementing the
//! core `BookingStore` trait, and a GoTrue client behind the
//! [`SessionService`] trait for admin sign-in and token verification.
//!
//! Both clients are thin REST wrappers; row atomicity, sessions, and
//! token lifetimes are the hosted service's concern. Raw API errors are
//! logged here and mapped to generic store errors before they reach the
//! flow layer.

mod auth;
mod error;
mod supabase;

pub use auth::{AuthClient, AuthUser, Session, SessionService};
pub use error::{Result, StoreError};
pub use supabase::SupabaseStore;
