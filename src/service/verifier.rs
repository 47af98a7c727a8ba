use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::error::CheckoutError;

type HmacSha256 = Hmac<Sha256>;

/// Recomputes the gateway signature over `order_id|payment_id` and checks it
/// against the supplied hex digest. `verify_slice` compares in constant
/// time, so a forged signature cannot be probed byte by byte. Pure and
/// stateless; same inputs always yield the same verdict.
pub fn verify_callback_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    supplied_hex: &str,
) -> Result<(), CheckoutError> {
    let supplied =
        hex::decode(supplied_hex).map_err(|_| CheckoutError::PaymentVerificationFailed)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| CheckoutError::PaymentVerificationFailed)?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    mac.verify_slice(&supplied)
        .map_err(|_| CheckoutError::PaymentVerificationFailed)
}

/// What the gateway computes on its side.
pub fn callback_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
