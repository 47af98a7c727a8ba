use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

#[derive(Debug, Clone, Serialize)]
pub struct TierSnapshot {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub price_minor: i64,
    pub currency: String,
    pub total_quantity: i32,
    pub remaining_quantity: i32,
    pub max_per_user: i32,
    pub is_active: bool,
    pub sale_start_datetime: DateTime<Utc>,
    pub sale_end_datetime: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TicketTiersRepo {
    pub pool: PgPool,
}

impl TicketTiersRepo {
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<TierSnapshot>> {
        let rows = sqlx::query(
            r#"
            SELECT id, event_id, name, price_minor, currency, total_quantity, remaining_quantity,
                   max_per_user, is_active, sale_start_datetime, sale_end_datetime
            FROM ticket_tiers
            WHERE event_id = $1
            ORDER BY price_minor ASC, id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(to_snapshot).collect())
    }

    /// Atomic compare-and-decrement. The row lock taken by the UPDATE is the
    /// serialization point for concurrent buyers racing the same tier; the
    /// WHERE clause makes an exhausted tier match zero rows instead of going
    /// negative. Returns the unit price read in the same statement so line
    /// items freeze the price observed inside the transaction.
    pub async fn decrement_tx(
        tx: &mut Transaction<'_, Postgres>,
        tier_id: i64,
        quantity: i32,
    ) -> Result<Option<i64>> {
        let row = sqlx::query(
            r#"
            UPDATE ticket_tiers
            SET remaining_quantity = remaining_quantity - $2
            WHERE id = $1 AND remaining_quantity >= $2
            RETURNING price_minor
            "#,
        )
        .bind(tier_id)
        .bind(quantity)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(row.map(|r| r.get("price_minor")))
    }

    /// Inverse of decrement, used when a confirmed booking is cancelled.
    pub async fn increment_tx(
        tx: &mut Transaction<'_, Postgres>,
        tier_id: i64,
        quantity: i32,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE ticket_tiers SET remaining_quantity = remaining_quantity + $2 WHERE id = $1",
        )
        .bind(tier_id)
        .bind(quantity)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }
}

fn to_snapshot(r: PgRow) -> TierSnapshot {
    TierSnapshot {
        id: r.get("id"),
        event_id: r.get("event_id"),
        name: r.get("name"),
        price_minor: r.get("price_minor"),
        currency: r.get("currency"),
        total_quantity: r.get("total_quantity"),
        remaining_quantity: r.get("remaining_quantity"),
        max_per_user: r.get("max_per_user"),
        is_active: r.get("is_active"),
        sale_start_datetime: r.get("sale_start_datetime"),
        sale_end_datetime: r.get("sale_end_datetime"),
    }
}
