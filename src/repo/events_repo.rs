use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSummary {
    pub id: i64,
    pub uuid: Uuid,
    pub title: String,
    pub venue_name: String,
    pub venue_address: Option<String>,
    pub start_datetime: DateTime<Utc>,
}

#[derive(Clone)]
pub struct EventsRepo {
    pub pool: PgPool,
}

impl EventsRepo {
    pub async fn get(&self, event_id: i64) -> Result<Option<EventSummary>> {
        let row = sqlx::query(
            "SELECT id, uuid, title, venue_name, venue_address, start_datetime FROM events WHERE id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| EventSummary {
            id: r.get("id"),
            uuid: r.get("uuid"),
            title: r.get("title"),
            venue_name: r.get("venue_name"),
            venue_address: r.get("venue_address"),
            start_datetime: r.get("start_datetime"),
        }))
    }
}
