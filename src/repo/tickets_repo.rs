use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};

pub struct TicketInput {
    pub booking_id: i64,
    pub line_item_id: i64,
    pub tier_id: i64,
    pub ticket_number: String,
    pub verification_token: String,
    pub scan_code: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub attendee_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredTicket {
    pub id: i64,
    pub booking_id: i64,
    pub ticket_number: String,
    pub verification_token: String,
    pub scan_code: String,
    pub attendee_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketVerification {
    pub ticket_number: String,
    pub scan_code: String,
    pub attendee_name: String,
    pub booking_reference: String,
    pub booking_status: String,
    pub event_title: String,
    pub venue_name: String,
    pub start_datetime: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TicketsRepo {
    pub pool: PgPool,
}

impl TicketsRepo {
    /// Ticket numbers are derived deterministically from the booking, so a
    /// re-issue after a partial failure hits the conflict arm and leaves the
    /// original row untouched.
    pub async fn insert(&self, data: &TicketInput) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tickets (
                booking_id, line_item_id, tier_id, ticket_number, verification_token,
                scan_code, attendee_name, attendee_email, attendee_phone
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (ticket_number) DO NOTHING
            "#,
        )
        .bind(data.booking_id)
        .bind(data.line_item_id)
        .bind(data.tier_id)
        .bind(&data.ticket_number)
        .bind(&data.verification_token)
        .bind(&data.scan_code)
        .bind(&data.attendee_name)
        .bind(&data.attendee_email)
        .bind(data.attendee_phone.clone())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_for_booking(&self, booking_id: i64) -> Result<Vec<StoredTicket>> {
        let rows = sqlx::query(
            r#"
            SELECT id, booking_id, ticket_number, verification_token, scan_code, attendee_name
            FROM tickets
            WHERE booking_id = $1
            ORDER BY ticket_number ASC
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StoredTicket {
                id: r.get("id"),
                booking_id: r.get("booking_id"),
                ticket_number: r.get("ticket_number"),
                verification_token: r.get("verification_token"),
                scan_code: r.get("scan_code"),
                attendee_name: r.get("attendee_name"),
            })
            .collect())
    }

    /// Door-staff lookup. The token is the only identifier the scan URL
    /// carries; internal row ids never leave the database.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<TicketVerification>> {
        let row = sqlx::query(
            r#"
            SELECT t.ticket_number, t.scan_code, t.attendee_name,
                   b.booking_reference, b.booking_status,
                   e.title AS event_title, e.venue_name, e.start_datetime
            FROM tickets t
            JOIN bookings b ON b.id = t.booking_id
            JOIN events e ON e.id = b.event_id
            WHERE t.verification_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| TicketVerification {
            ticket_number: r.get("ticket_number"),
            scan_code: r.get("scan_code"),
            attendee_name: r.get("attendee_name"),
            booking_reference: r.get("booking_reference"),
            booking_status: r.get("booking_status"),
            event_title: r.get("event_title"),
            venue_name: r.get("venue_name"),
            start_datetime: r.get("start_datetime"),
        }))
    }
}
