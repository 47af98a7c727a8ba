use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TicketDelivery {
    pub recipient_email: String,
    pub booking_reference: String,
    pub event_title: String,
    pub venue_name: String,
    pub start_datetime: DateTime<Utc>,
    pub tickets: Vec<DeliveredTicket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveredTicket {
    pub ticket_number: String,
    pub verify_url: String,
    pub scan_code: String,
    pub attendee_name: String,
}

/// Boundary to the delivery channel. Invoked outside the settlement
/// transaction; a slow or failing channel never holds locks or unwinds a
/// financially final booking.
#[derive(Clone)]
pub struct NotificationDispatcher {
    pub client: reqwest::Client,
    pub endpoint: Option<String>,
}

impl NotificationDispatcher {
    pub async fn send_tickets(&self, delivery: &TicketDelivery) -> Result<()> {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(
                reference = %delivery.booking_reference,
                "no notification endpoint configured, skipping ticket delivery"
            );
            return Ok(());
        };

        self.client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(delivery)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
