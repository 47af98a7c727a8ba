use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::booking::OpenCheckoutRequest;
use crate::domain::cart::Cart;
use crate::domain::error::CheckoutError;
use crate::gateways::{GatewayOrder, OrderRequest, PaymentGateway};
use crate::repo::events_repo::EventsRepo;
use crate::repo::ticket_tiers_repo::{TicketTiersRepo, TierSnapshot};
use crate::service::order_store::{OrderContext, OrderContextStore};

#[derive(Debug, Clone)]
pub struct PricedLine {
    pub tier_id: i64,
    pub quantity: i32,
    pub unit_price_minor: i64,
    pub line_total_minor: i64,
}

#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total_minor: i64,
    pub currency: String,
}

/// Prices a validated cart against a catalog snapshot. The inventory check
/// here is a soft pre-check for early rejection; the committer re-validates
/// inside its transaction. The total is computed from current tier prices
/// only — a client-supplied amount never reaches the gateway.
pub fn price_cart(
    tiers: &[TierSnapshot],
    cart: &Cart,
    now: DateTime<Utc>,
) -> Result<PricedCart, CheckoutError> {
    let mut lines = Vec::with_capacity(cart.lines().len());
    let mut total = 0i64;
    let mut currency: Option<String> = None;

    for line in cart.lines() {
        let tier = tiers
            .iter()
            .find(|t| t.id == line.tier_id)
            .ok_or(CheckoutError::TierNotFound(line.tier_id))?;

        if !tier.is_active || now < tier.sale_start_datetime || now > tier.sale_end_datetime {
            return Err(CheckoutError::TierInactive(tier.id));
        }
        if line.quantity > tier.max_per_user {
            return Err(CheckoutError::QuantityExceedsCap(tier.id));
        }
        if line.quantity > tier.remaining_quantity {
            return Err(CheckoutError::InsufficientInventory(tier.id));
        }

        match &currency {
            None => currency = Some(tier.currency.clone()),
            Some(c) if *c == tier.currency => {}
            Some(_) => return Err(CheckoutError::MixedCurrencyCart),
        }

        let line_total = tier.price_minor * i64::from(line.quantity);
        total += line_total;
        lines.push(PricedLine {
            tier_id: tier.id,
            quantity: line.quantity,
            unit_price_minor: tier.price_minor,
            line_total_minor: line_total,
        });
    }

    Ok(PricedCart {
        lines,
        total_minor: total,
        currency: currency.unwrap_or_else(|| "INR".to_string()),
    })
}

pub enum OpenedOrder {
    Gateway(GatewayOrder),
    /// Zero total: nothing to collect, the context goes straight to the
    /// committer without a gateway round trip.
    Free(OrderContext),
}

#[derive(Clone)]
pub struct OrderService {
    pub events_repo: EventsRepo,
    pub tiers_repo: TicketTiersRepo,
    pub order_store: OrderContextStore,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl OrderService {
    pub async fn open(
        &self,
        user_id: i64,
        req: OpenCheckoutRequest,
    ) -> Result<OpenedOrder, CheckoutError> {
        let event = self
            .events_repo
            .get(req.event_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or(CheckoutError::EventNotFound(req.event_id))?;

        let cart = Cart::new(req.items)?;
        let tiers = self
            .tiers_repo
            .list_for_event(event.id)
            .await
            .map_err(CheckoutError::Internal)?;

        let now = Utc::now();
        let priced = price_cart(&tiers, &cart, now)?;

        let receipt = format!("receipt_{}_{}_{}", event.id, user_id, now.timestamp_millis());
        let notes = json!({
            "event_id": event.id.to_string(),
            "user_id": user_id.to_string(),
            "attendee_name": req.attendee.name.clone(),
            "attendee_email": req.attendee.email.clone(),
        });

        let context = OrderContext {
            user_id,
            event_id: event.id,
            lines: cart.into_lines(),
            attendee: req.attendee,
            amount_minor: priced.total_minor,
            currency: priced.currency.clone(),
            receipt: receipt.clone(),
            opened_at: now,
        };

        if priced.total_minor == 0 {
            return Ok(OpenedOrder::Free(context));
        }

        let order = self
            .gateway
            .create_order(OrderRequest {
                amount_minor: priced.total_minor,
                currency: priced.currency,
                receipt,
                notes,
            })
            .await
            .map_err(|e| CheckoutError::GatewayUnavailable(e.to_string()))?;

        self.order_store
            .put(&order.order_id, &context)
            .await
            .map_err(CheckoutError::Internal)?;

        tracing::info!(
            order_id = %order.order_id,
            event_id = event.id,
            amount_minor = order.amount_minor,
            "gateway order opened"
        );

        Ok(OpenedOrder::Gateway(order))
    }
}
