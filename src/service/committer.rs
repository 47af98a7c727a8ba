use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::booking::{booking_reference, AttendeeInfo, BookingStatus, PaymentStatus};
use crate::domain::cart::CartLine;
use crate::domain::error::CheckoutError;
use crate::repo::bookings_repo::{BookingRecordInput, BookingsRepo};
use crate::repo::outbox_repo::OutboxRepo;
use crate::repo::payments_repo::{PaymentInsert, PaymentRecordInput, PaymentsRepo};
use crate::repo::ticket_tiers_repo::TicketTiersRepo;

#[derive(Debug, Clone)]
pub struct VerifiedPayment {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

pub struct SettlementInput {
    pub user_id: i64,
    pub event_id: i64,
    pub lines: Vec<CartLine>,
    pub attendee: AttendeeInfo,
    pub amount_minor: i64,
    pub currency: String,
    /// None for free checkouts, which settle without a gateway round trip.
    pub payment: Option<VerifiedPayment>,
}

#[derive(Debug, Clone)]
pub struct CommittedLineItem {
    pub id: i64,
    pub tier_id: i64,
    pub quantity: i32,
    pub unit_price_minor: i64,
}

#[derive(Debug, Clone)]
pub struct CommittedBooking {
    pub id: i64,
    pub uuid: Uuid,
    pub booking_reference: String,
    pub user_id: i64,
    pub event_id: i64,
    pub subtotal_minor: i64,
    pub final_minor: i64,
    pub currency: String,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub attendee: AttendeeInfo,
    pub line_items: Vec<CommittedLineItem>,
}

/// Sole writer of `ticket_tiers.remaining_quantity`. Everything between
/// `begin` and `commit` is all-or-nothing: a verified payment either becomes
/// a booking with decremented inventory, line items, a payment row and an
/// outbox event, or nothing at all is persisted.
#[derive(Clone)]
pub struct BookingCommitter {
    pub pool: PgPool,
    pub outbox_repo: OutboxRepo,
}

impl BookingCommitter {
    pub async fn commit(&self, input: SettlementInput) -> Result<CommittedBooking, CheckoutError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CheckoutError::Internal(e.into()))?;

        // Payment row goes in first: a redelivered callback trips the
        // (gateway_order_id, gateway_payment_id) unique index here and the
        // tier rows are never touched a second time.
        let payment_row = match &input.payment {
            Some(p) => {
                let record = PaymentRecordInput {
                    user_id: input.user_id,
                    gateway_order_id: p.order_id.clone(),
                    gateway_payment_id: p.payment_id.clone(),
                    gateway_signature: p.signature.clone(),
                    amount_minor: input.amount_minor,
                    currency: input.currency.clone(),
                    gateway_response: json!({
                        "razorpay_order_id": p.order_id,
                        "razorpay_payment_id": p.payment_id,
                        "razorpay_signature": p.signature,
                    }),
                };
                match PaymentsRepo::insert_payment_tx(&mut tx, &record)
                    .await
                    .map_err(CheckoutError::Internal)?
                {
                    PaymentInsert::Inserted(id) => Some(id),
                    PaymentInsert::Duplicate => {
                        tracing::warn!(
                            order_id = %p.order_id,
                            payment_id = %p.payment_id,
                            "duplicate payment callback rejected"
                        );
                        return Err(CheckoutError::DuplicatePaymentCallback);
                    }
                }
            }
            None => None,
        };

        // Re-validate and decrement inside the transaction. The soft check
        // at order-open time is stale by now; the row lock taken per tier is
        // what serializes concurrent buyers. Tiers are locked in id order so
        // two multi-tier carts can never deadlock each other.
        let mut lines = input.lines.clone();
        lines.sort_by_key(|l| l.tier_id);

        let mut priced_lines = Vec::with_capacity(lines.len());
        let mut subtotal = 0i64;
        for line in &lines {
            match TicketTiersRepo::decrement_tx(&mut tx, line.tier_id, line.quantity)
                .await
                .map_err(CheckoutError::Internal)?
            {
                Some(price_minor) => {
                    subtotal += price_minor * i64::from(line.quantity);
                    priced_lines.push((line.clone(), price_minor));
                }
                None => {
                    drop(tx);
                    return Err(self.record_inventory_loss(&input, line.tier_id).await);
                }
            }
        }

        let uuid = Uuid::new_v4();
        let now = Utc::now();
        let reference = booking_reference(input.event_id, now, &uuid);

        if input.payment.is_some() && subtotal != input.amount_minor {
            tracing::warn!(
                reference = %reference,
                captured_minor = input.amount_minor,
                repriced_minor = subtotal,
                "tier price changed between order open and settlement"
            );
        }

        let record = BookingRecordInput {
            uuid,
            booking_reference: reference.clone(),
            user_id: input.user_id,
            event_id: input.event_id,
            subtotal_minor: subtotal,
            discount_minor: 0,
            final_minor: input.amount_minor,
            currency: input.currency.clone(),
            booking_status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Completed,
            attendee: input.attendee.clone(),
        };
        let booking_id = BookingsRepo::insert_booking_tx(&mut tx, &record)
            .await
            .map_err(CheckoutError::Internal)?;

        let mut line_items = Vec::with_capacity(priced_lines.len());
        for (line, price_minor) in &priced_lines {
            let item_id = BookingsRepo::insert_line_item_tx(
                &mut tx,
                booking_id,
                line.tier_id,
                line.quantity,
                *price_minor,
            )
            .await
            .map_err(CheckoutError::Internal)?;
            line_items.push(CommittedLineItem {
                id: item_id,
                tier_id: line.tier_id,
                quantity: line.quantity,
                unit_price_minor: *price_minor,
            });
        }

        if let Some(payment_id) = payment_row {
            PaymentsRepo::attach_booking_tx(&mut tx, payment_id, booking_id)
                .await
                .map_err(CheckoutError::Internal)?;
        }

        OutboxRepo::insert_tx(
            &mut tx,
            "booking.confirmed",
            Some(&format!("booking.confirmed:{uuid}")),
            json!({
                "booking_reference": reference,
                "booking_uuid": uuid,
                "event_id": input.event_id,
                "user_id": input.user_id,
                "final_minor": input.amount_minor,
                "currency": input.currency,
            }),
        )
        .await
        .map_err(CheckoutError::Internal)?;

        tx.commit()
            .await
            .map_err(|e| CheckoutError::Internal(e.into()))?;

        tracing::info!(reference = %reference, booking_id, "booking confirmed");

        Ok(CommittedBooking {
            id: booking_id,
            uuid,
            booking_reference: reference,
            user_id: input.user_id,
            event_id: input.event_id,
            subtotal_minor: subtotal,
            final_minor: input.amount_minor,
            currency: input.currency,
            booking_status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Completed,
            attendee: input.attendee,
            line_items,
        })
    }

    /// Cancels a confirmed booking: statuses flip through the explicit
    /// transition table and every line item's quantity goes back to its
    /// tier, keeping the inventory accounting equation intact.
    pub async fn cancel(&self, reference: &str) -> Result<(), CheckoutError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CheckoutError::Internal(e.into()))?;

        let booking = BookingsRepo::lock_by_reference_tx(&mut tx, reference)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or_else(|| CheckoutError::BookingNotFound(reference.to_string()))?;

        let booking_status = BookingStatus::parse(&booking.booking_status)
            .ok_or(CheckoutError::InvalidStatusTransition)?;
        let payment_status = PaymentStatus::parse(&booking.payment_status)
            .ok_or(CheckoutError::InvalidStatusTransition)?;
        if !booking_status.can_transition(BookingStatus::Cancelled)
            || !payment_status.can_transition(PaymentStatus::Refunded)
        {
            return Err(CheckoutError::InvalidStatusTransition);
        }

        let items = BookingsRepo::line_items_tx(&mut tx, booking.id)
            .await
            .map_err(CheckoutError::Internal)?;
        for item in &items {
            TicketTiersRepo::increment_tx(&mut tx, item.tier_id, item.quantity)
                .await
                .map_err(CheckoutError::Internal)?;
        }

        BookingsRepo::update_status_tx(
            &mut tx,
            booking.id,
            BookingStatus::Cancelled,
            PaymentStatus::Refunded,
        )
        .await
        .map_err(CheckoutError::Internal)?;
        PaymentsRepo::mark_refunded_tx(&mut tx, booking.id)
            .await
            .map_err(CheckoutError::Internal)?;

        OutboxRepo::insert_tx(
            &mut tx,
            "booking.cancelled",
            Some(&format!("booking.cancelled:{}", booking.uuid)),
            json!({
                "booking_reference": booking.booking_reference,
                "booking_uuid": booking.uuid,
                "event_id": booking.event_id,
                "user_id": booking.user_id,
                "refund_minor": booking.final_minor,
                "currency": booking.currency,
            }),
        )
        .await
        .map_err(CheckoutError::Internal)?;

        tx.commit()
            .await
            .map_err(|e| CheckoutError::Internal(e.into()))?;

        tracing::info!(reference = %booking.booking_reference, "booking cancelled, inventory restored");
        Ok(())
    }

    /// The transaction has already rolled back; nothing was persisted. For a
    /// captured payment this is real money without a booking, so the loss is
    /// written through the outbox for refund reconciliation instead of being
    /// dropped. A free checkout losing the race is just a retryable reject.
    async fn record_inventory_loss(&self, input: &SettlementInput, tier_id: i64) -> CheckoutError {
        let Some(payment) = &input.payment else {
            return CheckoutError::InsufficientInventory(tier_id);
        };

        tracing::error!(
            order_id = %payment.order_id,
            payment_id = %payment.payment_id,
            tier_id,
            amount_minor = input.amount_minor,
            "payment captured but inventory exhausted, queued for reconciliation"
        );

        let queued = self
            .outbox_repo
            .insert(
                "payment.oversold",
                Some(&format!("payment.oversold:{}:{}", payment.order_id, payment.payment_id)),
                json!({
                    "gateway_order_id": payment.order_id,
                    "gateway_payment_id": payment.payment_id,
                    "user_id": input.user_id,
                    "event_id": input.event_id,
                    "tier_id": tier_id,
                    "amount_minor": input.amount_minor,
                    "currency": input.currency,
                }),
            )
            .await;
        if let Err(e) = queued {
            tracing::error!("failed to queue oversold reconciliation event: {e}");
        }

        CheckoutError::OversoldAttempt(tier_id)
    }
}
