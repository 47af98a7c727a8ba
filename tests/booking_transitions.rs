use chrono::Utc;
use eventhive_bookings::domain::booking::{booking_reference, BookingStatus, PaymentStatus};
use uuid::Uuid;

#[test]
fn booking_confirms_exactly_once() {
    assert!(BookingStatus::Pending.can_transition(BookingStatus::Confirmed));
    assert!(!BookingStatus::Confirmed.can_transition(BookingStatus::Confirmed));
    assert!(!BookingStatus::Confirmed.can_transition(BookingStatus::Pending));
}

#[test]
fn confirmed_booking_can_only_cancel() {
    assert!(BookingStatus::Confirmed.can_transition(BookingStatus::Cancelled));
    assert!(!BookingStatus::Cancelled.can_transition(BookingStatus::Confirmed));
    assert!(!BookingStatus::Cancelled.can_transition(BookingStatus::Pending));
}

#[test]
fn refund_requires_a_completed_payment() {
    assert!(PaymentStatus::Completed.can_transition(PaymentStatus::Refunded));
    assert!(!PaymentStatus::Pending.can_transition(PaymentStatus::Refunded));
    assert!(!PaymentStatus::Failed.can_transition(PaymentStatus::Refunded));
    assert!(!PaymentStatus::Refunded.can_transition(PaymentStatus::Completed));
}

#[test]
fn statuses_round_trip_through_storage() {
    for status in [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
    ] {
        assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
    }
    for status in [
        PaymentStatus::Pending,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
    ] {
        assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(BookingStatus::parse("confirmed"), None);
}

#[test]
fn reference_embeds_event_and_differs_per_booking() {
    let now = Utc::now();
    let a = booking_reference(9, now, &Uuid::new_v4());
    let b = booking_reference(9, now, &Uuid::new_v4());

    assert!(a.starts_with("EVT-9-"));
    assert_ne!(a, b);
}
