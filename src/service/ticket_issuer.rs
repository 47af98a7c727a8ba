use anyhow::Result;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::repo::tickets_repo::{StoredTicket, TicketInput, TicketsRepo};
use crate::service::committer::CommittedBooking;

type HmacSha256 = Hmac<Sha256>;

/// Reconstructable from the booking alone — no second id allocator.
pub fn ticket_number(booking_id: i64, line_item_id: i64, seq: i32) -> String {
    format!("TKT-{}-{}-{}", booking_id, line_item_id, seq)
}

/// Verification token and scan code from one MAC over
/// `booking_uuid|ticket_number`. Deterministic, so re-issuing a booking's
/// tickets always reproduces the same codes, but unguessable without the
/// signing secret — the token is the only identifier the scan URL carries.
pub fn ticket_codes(secret: &str, booking_uuid: &Uuid, ticket_number: &str) -> (String, String) {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(booking_uuid.to_string().as_bytes());
    mac.update(b"|");
    mac.update(ticket_number.as_bytes());
    let bytes = mac.finalize().into_bytes();

    let token = hex::encode(bytes);

    let mut n = 0u64;
    for b in &bytes[..8] {
        n = (n << 8) | u64::from(*b);
    }
    let scan_code = format!("{:012}", n % 1_000_000_000_000);

    (token, scan_code)
}

#[derive(Clone)]
pub struct TicketIssuer {
    pub tickets_repo: TicketsRepo,
    pub ticket_secret: String,
    pub app_base_url: String,
}

impl TicketIssuer {
    pub fn verify_url(&self, token: &str) -> String {
        format!("{}/verify-ticket/{}", self.app_base_url.trim_end_matches('/'), token)
    }

    /// Mints one ticket per purchased unit. Runs after the booking
    /// transaction has committed; a failure here leaves the booking
    /// confirmed and the missing tickets are re-derived on the next issue
    /// call, which the unique ticket number makes idempotent.
    pub async fn issue(&self, booking: &CommittedBooking) -> Result<Vec<StoredTicket>> {
        for item in &booking.line_items {
            for seq in 1..=item.quantity {
                let number = ticket_number(booking.id, item.id, seq);
                let (token, scan_code) = ticket_codes(&self.ticket_secret, &booking.uuid, &number);
                self.tickets_repo
                    .insert(&TicketInput {
                        booking_id: booking.id,
                        line_item_id: item.id,
                        tier_id: item.tier_id,
                        ticket_number: number,
                        verification_token: token,
                        scan_code,
                        attendee_name: booking.attendee.name.clone(),
                        attendee_email: booking.attendee.email.clone(),
                        attendee_phone: booking.attendee.phone.clone(),
                    })
                    .await?;
            }
        }

        self.tickets_repo.list_for_booking(booking.id).await
    }
}
