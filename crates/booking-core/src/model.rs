//! Booking Record Model
//!
//! The booking record is the sole persisted entity. Status and category
//! wire names match the `bookings` table columns in the hosted store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Flat deposit charged for every booking, regardless of category.
pub const DEPOSIT_USD: i64 = 25;

/// Sentinel stored when the customer leaves the phone field blank.
pub const PHONE_NOT_PROVIDED: &str = "Not provided";

/// Booking lifecycle status.
///
/// The only forward path is
/// `pending_payment → pending → confirmed | cancelled`; there is no
/// automated reversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Deposit intent created, payment not yet confirmed
    PendingPayment,
    /// No payment required, or payment confirmed; awaiting manual review
    Pending,
    /// Admin-approved
    Confirmed,
    /// Admin-rejected
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::PendingPayment => "pending_payment",
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a wire-format status value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_payment" => Some(BookingStatus::PendingPayment),
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether `self → next` is a legal forward transition.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (BookingStatus::PendingPayment, BookingStatus::Pending)
                | (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tattoo service category offered on the booking form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TattooCategory {
    Custom,
    Flash,
    CoverUp,
    Consultation,
}

impl TattooCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TattooCategory::Custom => "custom",
            TattooCategory::Flash => "flash",
            TattooCategory::CoverUp => "cover-up",
            TattooCategory::Consultation => "consultation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "custom" => Some(TattooCategory::Custom),
            "flash" => Some(TattooCategory::Flash),
            "cover-up" => Some(TattooCategory::CoverUp),
            "consultation" => Some(TattooCategory::Consultation),
            _ => None,
        }
    }
}

impl std::fmt::Display for TattooCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted booking record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
    /// Store-assigned identifier (serial or uuid, kept opaque)
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// Always populated; blank form input becomes [`PHONE_NOT_PROVIDED`]
    pub phone: String,

    #[serde(rename = "tattoo_type")]
    pub tattoo_category: TattooCategory,

    /// Free-text description; on the paid path a payment-info block is
    /// appended for human readability
    pub description: String,

    /// Authoritative payment-intent reference for confirmation lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    /// Defaults to the submission date (UTC)
    pub preferred_date: NaiveDate,

    /// Store-assigned creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Absent on free-path inserts so the store default applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

/// Insert payload for a new booking record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewBooking {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,

    #[serde(rename = "tattoo_type")]
    pub tattoo_category: TattooCategory,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    pub preferred_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

/// Accept both numeric (serial) and string (uuid) primary keys from the
/// record store.
fn opaque_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "booking id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&BookingStatus::PendingPayment).unwrap();
        assert_eq!(json, "\"pending_payment\"");

        let parsed: BookingStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, BookingStatus::Cancelled);
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!(BookingStatus::parse("pending"), Some(BookingStatus::Pending));
        assert_eq!(BookingStatus::parse("archived"), None);
        assert_eq!(BookingStatus::parse(""), None);
    }

    #[test]
    fn test_forward_only_transitions() {
        use BookingStatus::*;

        assert!(PendingPayment.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));

        // No reversals, no skips
        assert!(!Pending.can_transition_to(PendingPayment));
        assert!(!PendingPayment.can_transition_to(Confirmed));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(TattooCategory::parse("cover-up"), Some(TattooCategory::CoverUp));
        assert_eq!(TattooCategory::parse("coverup"), None);

        let json = serde_json::to_string(&TattooCategory::CoverUp).unwrap();
        assert_eq!(json, "\"cover-up\"");
    }

    #[test]
    fn test_booking_decodes_numeric_id() {
        let row = serde_json::json!({
            "id": 42,
            "first_name": "John",
            "last_name": "Doe",
            "email": "john@x.com",
            "phone": "Not provided",
            "tattoo_type": "flash",
            "description": "rose",
            "preferred_date": "2026-08-30",
            "created_at": "2026-08-30T12:00:00Z",
            "status": "pending"
        });

        let booking: Booking = serde_json::from_value(row).unwrap();
        assert_eq!(booking.id, "42");
        assert_eq!(booking.status, Some(BookingStatus::Pending));
        assert_eq!(booking.payment_intent_id, None);
    }

    #[test]
    fn test_new_booking_omits_absent_status() {
        let record = NewBooking {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john@x.com".into(),
            phone: PHONE_NOT_PROVIDED.into(),
            tattoo_category: TattooCategory::Flash,
            description: "rose".into(),
            payment_intent_id: None,
            preferred_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            status: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("status").is_none());
        assert!(json.get("payment_intent_id").is_none());
        assert_eq!(json["tattoo_type"], "flash");
    }
}
