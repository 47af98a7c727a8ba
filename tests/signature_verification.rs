use eventhive_bookings::domain::error::CheckoutError;
use eventhive_bookings::service::verifier::{callback_signature, verify_callback_signature};

#[test]
fn accepts_matching_signature() {
    let sig = callback_signature("shared-secret", "order_abc", "pay_def");
    assert!(verify_callback_signature("shared-secret", "order_abc", "pay_def", &sig).is_ok());
}

#[test]
fn rejects_signature_from_wrong_secret() {
    let sig = callback_signature("attacker-secret", "order_abc", "pay_def");
    let err = verify_callback_signature("shared-secret", "order_abc", "pay_def", &sig).unwrap_err();
    assert!(matches!(err, CheckoutError::PaymentVerificationFailed));
}

#[test]
fn rejects_signature_bound_to_other_payment() {
    let sig = callback_signature("shared-secret", "order_abc", "pay_one");
    let err = verify_callback_signature("shared-secret", "order_abc", "pay_two", &sig).unwrap_err();
    assert!(matches!(err, CheckoutError::PaymentVerificationFailed));
}

#[test]
fn rejects_non_hex_signature() {
    let err =
        verify_callback_signature("shared-secret", "order_abc", "pay_def", "not-hex!").unwrap_err();
    assert!(matches!(err, CheckoutError::PaymentVerificationFailed));
}

#[test]
fn rejects_truncated_signature() {
    let sig = callback_signature("shared-secret", "order_abc", "pay_def");
    let err =
        verify_callback_signature("shared-secret", "order_abc", "pay_def", &sig[..16]).unwrap_err();
    assert!(matches!(err, CheckoutError::PaymentVerificationFailed));
}
