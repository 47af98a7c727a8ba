use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cart::CartLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// A booking is confirmed exactly once and is immutable afterwards
    /// except for cancellation.
    pub fn can_transition(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn can_transition(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Completed, PaymentStatus::Refunded)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(PaymentStatus::Pending),
            "COMPLETED" => Some(PaymentStatus::Completed),
            "FAILED" => Some(PaymentStatus::Failed),
            "REFUNDED" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

/// Contact details captured at purchase time. A snapshot, not a live
/// reference to the buyer's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeeInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Human-facing reference. The uuid suffix keeps two checkouts for the same
/// event in the same millisecond from colliding.
pub fn booking_reference(event_id: i64, now: DateTime<Utc>, uuid: &Uuid) -> String {
    let suffix = uuid.simple().to_string();
    format!("EVT-{}-{}-{}", event_id, now.timestamp_millis(), &suffix[..6])
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenCheckoutRequest {
    pub event_id: i64,
    pub items: Vec<CartLine>,
    pub attendee: AttendeeInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayCallback {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutOpened {
    /// The buyer still has to complete payment with the gateway.
    PaymentRequired {
        order_id: String,
        amount_minor: i64,
        currency: String,
        receipt: String,
        key_id: String,
    },
    /// Free carts settle immediately without a gateway round trip.
    Confirmed(BookingConfirmation),
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking_reference: String,
    pub booking_uuid: Uuid,
    pub event_id: i64,
    pub event_title: String,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub subtotal_minor: i64,
    pub final_minor: i64,
    pub currency: String,
    pub attendee: AttendeeInfo,
    pub tickets: Vec<TicketSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketSummary {
    pub ticket_number: String,
    pub verify_url: String,
    pub scan_code: String,
}
