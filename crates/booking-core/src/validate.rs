//! Booking Form Validation
//!
//! Syntactic checks applied to raw form input before any store or
//! processor call. A failure here never has side effects.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::model::{TattooCategory, PHONE_NOT_PROVIDED};

pub const MSG_REQUIRED: &str = "All required fields must be filled";
pub const MSG_PHONE: &str = "Please enter a valid US phone number or leave it blank";
pub const MSG_EMAIL: &str = "Please enter a valid email address";
pub const MSG_CATEGORY: &str = "Please select a valid tattoo service";

/// `local-part@domain.tld` — at least one non-whitespace run on each
/// side of the `@`, with a dot in the domain.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// US phone: optional +1/1, area code bare or in parentheses, then
/// 3-digit exchange and 4-digit subscriber with space/dot/hyphen
/// separators.
static US_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+1|1)?[-. ]?(\([0-9]{3}\)|[0-9]{3})[-. ]?[0-9]{3}[-. ]?[0-9]{4}$")
        .expect("phone pattern")
});

/// Raw booking form fields, exactly as submitted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub tattoo_category: String,
    #[serde(default)]
    pub description: String,
}

/// A booking that passed validation; fields are trimmed and the phone
/// is normalized.
#[derive(Clone, Debug)]
pub struct ValidatedBooking {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub category: TattooCategory,
    pub description: String,
}

/// Validate raw form input.
///
/// Check order matches the form: required fields, phone format, email
/// format, then category.
pub fn validate_booking(form: &BookingForm) -> Result<ValidatedBooking> {
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    let email = form.email.trim();
    let phone = form.phone.trim();
    let category = form.tattoo_category.trim();
    let description = form.description.trim();

    if first_name.is_empty()
        || last_name.is_empty()
        || email.is_empty()
        || category.is_empty()
        || description.is_empty()
    {
        return Err(CoreError::Validation(MSG_REQUIRED.into()));
    }

    let phone = if phone.is_empty() {
        PHONE_NOT_PROVIDED.to_string()
    } else if US_PHONE_RE.is_match(phone) {
        phone.to_string()
    } else {
        return Err(CoreError::Validation(MSG_PHONE.into()));
    };

    if !EMAIL_RE.is_match(email) {
        return Err(CoreError::Validation(MSG_EMAIL.into()));
    }

    let category = TattooCategory::parse(category)
        .ok_or_else(|| CoreError::Validation(MSG_CATEGORY.into()))?;

    Ok(ValidatedBooking {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone,
        category,
        description: description.to_string(),
    })
}
