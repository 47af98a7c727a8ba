use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::booking::{AttendeeInfo, BookingStatus, PaymentStatus};

pub struct BookingRecordInput {
    pub uuid: Uuid,
    pub booking_reference: String,
    pub user_id: i64,
    pub event_id: i64,
    pub subtotal_minor: i64,
    pub discount_minor: i64,
    pub final_minor: i64,
    pub currency: String,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub attendee: AttendeeInfo,
}

#[derive(Debug, Clone)]
pub struct StoredBooking {
    pub id: i64,
    pub uuid: Uuid,
    pub booking_reference: String,
    pub user_id: i64,
    pub event_id: i64,
    pub subtotal_minor: i64,
    pub discount_minor: i64,
    pub final_minor: i64,
    pub currency: String,
    pub booking_status: String,
    pub payment_status: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub attendee_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StoredLineItem {
    pub id: i64,
    pub booking_id: i64,
    pub tier_id: i64,
    pub quantity: i32,
    pub unit_price_minor: i64,
    pub line_total_minor: i64,
}

#[derive(Clone)]
pub struct BookingsRepo {
    pub pool: PgPool,
}

impl BookingsRepo {
    pub async fn insert_booking_tx(
        tx: &mut Transaction<'_, Postgres>,
        data: &BookingRecordInput,
    ) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO bookings (
                uuid, booking_reference, user_id, event_id,
                subtotal_minor, discount_minor, final_minor, currency,
                booking_status, payment_status,
                attendee_name, attendee_email, attendee_phone
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(data.uuid)
        .bind(&data.booking_reference)
        .bind(data.user_id)
        .bind(data.event_id)
        .bind(data.subtotal_minor)
        .bind(data.discount_minor)
        .bind(data.final_minor)
        .bind(&data.currency)
        .bind(data.booking_status.as_str())
        .bind(data.payment_status.as_str())
        .bind(&data.attendee.name)
        .bind(&data.attendee.email)
        .bind(data.attendee.phone.clone())
        .fetch_one(tx.as_mut())
        .await?;

        Ok(row.get("id"))
    }

    pub async fn insert_line_item_tx(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
        tier_id: i64,
        quantity: i32,
        unit_price_minor: i64,
    ) -> Result<i64> {
        let line_total = unit_price_minor * i64::from(quantity);
        let row = sqlx::query(
            r#"
            INSERT INTO booking_line_items (booking_id, tier_id, quantity, unit_price_minor, line_total_minor)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(booking_id)
        .bind(tier_id)
        .bind(quantity)
        .bind(unit_price_minor)
        .bind(line_total)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(row.get("id"))
    }

    pub async fn find_by_reference(&self, reference: &str) -> Result<Option<StoredBooking>> {
        let row = sqlx::query(&select_booking("booking_reference = $1"))
            .bind(reference)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(to_booking))
    }

    /// Row-locked read for status transitions.
    pub async fn lock_by_reference_tx(
        tx: &mut Transaction<'_, Postgres>,
        reference: &str,
    ) -> Result<Option<StoredBooking>> {
        let row = sqlx::query(&format!("{} FOR UPDATE", select_booking("booking_reference = $1")))
            .bind(reference)
            .fetch_optional(tx.as_mut())
            .await?;

        Ok(row.map(to_booking))
    }

    pub async fn update_status_tx(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
        booking_status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE bookings SET booking_status = $2, payment_status = $3, updated_at = now() WHERE id = $1",
        )
        .bind(booking_id)
        .bind(booking_status.as_str())
        .bind(payment_status.as_str())
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    /// Transaction-scoped variant used when restoring inventory on cancel.
    pub async fn line_items_tx(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
    ) -> Result<Vec<StoredLineItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, booking_id, tier_id, quantity, unit_price_minor, line_total_minor
            FROM booking_line_items
            WHERE booking_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(booking_id)
        .fetch_all(tx.as_mut())
        .await?;

        Ok(rows.into_iter().map(to_line_item).collect())
    }

    pub async fn line_items(&self, booking_id: i64) -> Result<Vec<StoredLineItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, booking_id, tier_id, quantity, unit_price_minor, line_total_minor
            FROM booking_line_items
            WHERE booking_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(to_line_item).collect())
    }
}

fn to_line_item(r: PgRow) -> StoredLineItem {
    StoredLineItem {
        id: r.get("id"),
        booking_id: r.get("booking_id"),
        tier_id: r.get("tier_id"),
        quantity: r.get("quantity"),
        unit_price_minor: r.get("unit_price_minor"),
        line_total_minor: r.get("line_total_minor"),
    }
}

fn select_booking(predicate: &str) -> String {
    format!(
        r#"
        SELECT id, uuid, booking_reference, user_id, event_id,
               subtotal_minor, discount_minor, final_minor, currency,
               booking_status, payment_status,
               attendee_name, attendee_email, attendee_phone, created_at
        FROM bookings
        WHERE {predicate}
        "#,
    )
}

fn to_booking(r: PgRow) -> StoredBooking {
    StoredBooking {
        id: r.get("id"),
        uuid: r.get("uuid"),
        booking_reference: r.get("booking_reference"),
        user_id: r.get("user_id"),
        event_id: r.get("event_id"),
        subtotal_minor: r.get("subtotal_minor"),
        discount_minor: r.get("discount_minor"),
        final_minor: r.get("final_minor"),
        currency: r.get("currency"),
        booking_status: r.get("booking_status"),
        payment_status: r.get("payment_status"),
        attendee_name: r.get("attendee_name"),
        attendee_email: r.get("attendee_email"),
        attendee_phone: r.get("attendee_phone"),
        created_at: r.get("created_at"),
    }
}
