use anyhow::Result;
use sqlx::{Postgres, Row, Transaction};

pub struct PaymentRecordInput {
    pub user_id: i64,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub gateway_signature: String,
    pub amount_minor: i64,
    pub currency: String,
    pub gateway_response: serde_json::Value,
}

pub enum PaymentInsert {
    Inserted(i64),
    /// The (gateway_order_id, gateway_payment_id) pair already exists —
    /// a redelivered callback that must not settle a second time.
    Duplicate,
}

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: sqlx::PgPool,
}

impl PaymentsRepo {
    /// Inserted before any inventory is touched so a redelivered callback
    /// aborts the transaction without ever reaching the tier rows.
    pub async fn insert_payment_tx(
        tx: &mut Transaction<'_, Postgres>,
        data: &PaymentRecordInput,
    ) -> Result<PaymentInsert> {
        let res = sqlx::query(
            r#"
            INSERT INTO payments (
                user_id, gateway, gateway_order_id, gateway_payment_id, gateway_signature,
                amount_minor, currency, status, gateway_response, completed_at
            ) VALUES ($1, 'RAZORPAY', $2, $3, $4, $5, $6, 'COMPLETED', $7, now())
            RETURNING id
            "#,
        )
        .bind(data.user_id)
        .bind(&data.gateway_order_id)
        .bind(&data.gateway_payment_id)
        .bind(&data.gateway_signature)
        .bind(data.amount_minor)
        .bind(&data.currency)
        .bind(&data.gateway_response)
        .fetch_one(tx.as_mut())
        .await;

        match res {
            Ok(row) => Ok(PaymentInsert::Inserted(row.get("id"))),
            Err(e) if is_unique_violation(&e) => Ok(PaymentInsert::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn attach_booking_tx(
        tx: &mut Transaction<'_, Postgres>,
        payment_id: i64,
        booking_id: i64,
    ) -> Result<()> {
        sqlx::query("UPDATE payments SET booking_id = $2 WHERE id = $1")
            .bind(payment_id)
            .bind(booking_id)
            .execute(tx.as_mut())
            .await?;

        Ok(())
    }

    pub async fn mark_refunded_tx(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
    ) -> Result<()> {
        sqlx::query("UPDATE payments SET status = 'REFUNDED' WHERE booking_id = $1")
            .bind(booking_id)
            .execute(tx.as_mut())
            .await?;

        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
