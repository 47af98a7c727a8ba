use anyhow::Result;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::domain::booking::AttendeeInfo;
use crate::domain::cart::CartLine;

/// Everything the committer needs to settle a gateway callback, parked at
/// order-open time. Nothing durable: an abandoned checkout simply expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderContext {
    pub user_id: i64,
    pub event_id: i64,
    pub lines: Vec<CartLine>,
    pub attendee: AttendeeInfo,
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,
    pub opened_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct OrderContextStore {
    pub redis_client: redis::Client,
    pub ttl_secs: u64,
}

impl OrderContextStore {
    pub async fn put(&self, order_id: &str, context: &OrderContext) -> Result<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(context)?;
        let _: () = conn.set_ex(key(order_id), payload, self.ttl_secs).await?;
        Ok(())
    }

    /// Read, not consume. A redelivered callback must still reach the
    /// committer so the payments unique index reports the duplicate; the
    /// TTL alone bounds how long an order id stays answerable.
    pub async fn get(&self, order_id: &str) -> Result<Option<OrderContext>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(key(order_id)).await?;
        match payload {
            Some(p) => Ok(Some(serde_json::from_str(&p)?)),
            None => Ok(None),
        }
    }
}

fn key(order_id: &str) -> String {
    format!("checkout:order:{order_id}")
}
