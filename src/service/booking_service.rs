use crate::domain::booking::{
    AttendeeInfo, BookingConfirmation, BookingStatus, CheckoutOpened, OpenCheckoutRequest,
    PaymentStatus, RazorpayCallback, TicketSummary,
};
use crate::domain::error::CheckoutError;
use crate::repo::bookings_repo::{BookingsRepo, StoredBooking, StoredLineItem};
use crate::repo::events_repo::{EventSummary, EventsRepo};
use crate::repo::tickets_repo::StoredTicket;
use crate::service::committer::{
    BookingCommitter, CommittedBooking, CommittedLineItem, SettlementInput, VerifiedPayment,
};
use crate::service::notification::{DeliveredTicket, NotificationDispatcher, TicketDelivery};
use crate::service::order_service::{OpenedOrder, OrderService};
use crate::service::order_store::{OrderContext, OrderContextStore};
use crate::service::ticket_issuer::TicketIssuer;
use crate::service::verifier;

/// Front door for the settlement pipeline: order open, callback settlement,
/// lookups, re-issue and cancellation. Handlers stay thin; this owns the
/// ordering between verifier, committer, issuer and dispatcher.
#[derive(Clone)]
pub struct BookingService {
    pub order_service: OrderService,
    pub committer: BookingCommitter,
    pub ticket_issuer: TicketIssuer,
    pub dispatcher: NotificationDispatcher,
    pub order_store: OrderContextStore,
    pub events_repo: EventsRepo,
    pub bookings_repo: BookingsRepo,
    pub callback_secret: String,
    pub razorpay_key_id: String,
}

impl BookingService {
    pub async fn open_checkout(
        &self,
        user_id: i64,
        req: OpenCheckoutRequest,
    ) -> Result<CheckoutOpened, CheckoutError> {
        match self.order_service.open(user_id, req).await? {
            OpenedOrder::Gateway(order) => Ok(CheckoutOpened::PaymentRequired {
                order_id: order.order_id,
                amount_minor: order.amount_minor,
                currency: order.currency,
                receipt: order.receipt,
                key_id: self.razorpay_key_id.clone(),
            }),
            OpenedOrder::Free(context) => {
                let confirmation = self.settle_context(context, None).await?;
                Ok(CheckoutOpened::Confirmed(confirmation))
            }
        }
    }

    pub async fn settle_callback(
        &self,
        cb: RazorpayCallback,
    ) -> Result<BookingConfirmation, CheckoutError> {
        if let Err(e) = verifier::verify_callback_signature(
            &self.callback_secret,
            &cb.razorpay_order_id,
            &cb.razorpay_payment_id,
            &cb.razorpay_signature,
        ) {
            tracing::warn!(
                order_id = %cb.razorpay_order_id,
                "payment callback failed signature verification"
            );
            return Err(e);
        }

        let context = self
            .order_store
            .get(&cb.razorpay_order_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or_else(|| CheckoutError::OrderNotFound(cb.razorpay_order_id.clone()))?;

        let payment = VerifiedPayment {
            order_id: cb.razorpay_order_id,
            payment_id: cb.razorpay_payment_id,
            signature: cb.razorpay_signature,
        };

        self.settle_context(context, Some(payment)).await
    }

    async fn settle_context(
        &self,
        context: OrderContext,
        payment: Option<VerifiedPayment>,
    ) -> Result<BookingConfirmation, CheckoutError> {
        let event = self
            .events_repo
            .get(context.event_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or(CheckoutError::EventNotFound(context.event_id))?;

        let committed = self
            .committer
            .commit(SettlementInput {
                user_id: context.user_id,
                event_id: context.event_id,
                lines: context.lines,
                attendee: context.attendee,
                amount_minor: context.amount_minor,
                currency: context.currency,
                payment,
            })
            .await?;

        // Issuance is best-effort relative to the committed booking: on
        // failure the checkout still reports success and the tickets are
        // re-derived by a later re-issue.
        let tickets = match self.ticket_issuer.issue(&committed).await {
            Ok(tickets) => tickets,
            Err(e) => {
                tracing::error!(
                    reference = %committed.booking_reference,
                    "ticket issuance failed, booking stays confirmed: {e}"
                );
                Vec::new()
            }
        };

        if !tickets.is_empty() {
            self.spawn_delivery(&committed, &event, &tickets);
        }

        Ok(self.confirmation(&committed, &event, &tickets))
    }

    /// Lookup surface for the buyer's "my bookings" view and the success
    /// page: booking, line totals and the already-issued tickets.
    pub async fn booking_details(
        &self,
        reference: &str,
    ) -> Result<BookingConfirmation, CheckoutError> {
        let (committed, event) = self.load_booking(reference).await?;
        let tickets = self
            .ticket_issuer
            .tickets_repo
            .list_for_booking(committed.id)
            .await
            .map_err(CheckoutError::Internal)?;

        Ok(self.confirmation(&committed, &event, &tickets))
    }

    /// Re-derives any missing tickets for a confirmed booking and re-sends
    /// the set. Safe to repeat: numbering and codes are deterministic.
    pub async fn reissue_tickets(
        &self,
        reference: &str,
    ) -> Result<BookingConfirmation, CheckoutError> {
        let (committed, event) = self.load_booking(reference).await?;
        if committed.booking_status != BookingStatus::Confirmed {
            return Err(CheckoutError::InvalidStatusTransition);
        }

        let tickets = self
            .ticket_issuer
            .issue(&committed)
            .await
            .map_err(CheckoutError::Internal)?;
        self.spawn_delivery(&committed, &event, &tickets);

        Ok(self.confirmation(&committed, &event, &tickets))
    }

    pub async fn cancel_booking(&self, reference: &str) -> Result<(), CheckoutError> {
        self.committer.cancel(reference).await
    }

    async fn load_booking(
        &self,
        reference: &str,
    ) -> Result<(CommittedBooking, EventSummary), CheckoutError> {
        let stored = self
            .bookings_repo
            .find_by_reference(reference)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or_else(|| CheckoutError::BookingNotFound(reference.to_string()))?;
        let items = self
            .bookings_repo
            .line_items(stored.id)
            .await
            .map_err(CheckoutError::Internal)?;
        let event = self
            .events_repo
            .get(stored.event_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or(CheckoutError::EventNotFound(stored.event_id))?;

        Ok((committed_from_stored(stored, items), event))
    }

    fn spawn_delivery(
        &self,
        committed: &CommittedBooking,
        event: &EventSummary,
        tickets: &[StoredTicket],
    ) {
        let dispatcher = self.dispatcher.clone();
        let delivery = TicketDelivery {
            recipient_email: committed.attendee.email.clone(),
            booking_reference: committed.booking_reference.clone(),
            event_title: event.title.clone(),
            venue_name: event.venue_name.clone(),
            start_datetime: event.start_datetime,
            tickets: tickets
                .iter()
                .map(|t| DeliveredTicket {
                    ticket_number: t.ticket_number.clone(),
                    verify_url: self.ticket_issuer.verify_url(&t.verification_token),
                    scan_code: t.scan_code.clone(),
                    attendee_name: t.attendee_name.clone(),
                })
                .collect(),
        };
        let reference = committed.booking_reference.clone();
        tokio::spawn(async move {
            if let Err(e) = dispatcher.send_tickets(&delivery).await {
                tracing::warn!(reference = %reference, "ticket delivery dispatch failed: {e}");
            }
        });
    }

    fn confirmation(
        &self,
        committed: &CommittedBooking,
        event: &EventSummary,
        tickets: &[StoredTicket],
    ) -> BookingConfirmation {
        BookingConfirmation {
            booking_reference: committed.booking_reference.clone(),
            booking_uuid: committed.uuid,
            event_id: committed.event_id,
            event_title: event.title.clone(),
            booking_status: committed.booking_status,
            payment_status: committed.payment_status,
            subtotal_minor: committed.subtotal_minor,
            final_minor: committed.final_minor,
            currency: committed.currency.clone(),
            attendee: committed.attendee.clone(),
            tickets: tickets
                .iter()
                .map(|t| TicketSummary {
                    ticket_number: t.ticket_number.clone(),
                    verify_url: self.ticket_issuer.verify_url(&t.verification_token),
                    scan_code: t.scan_code.clone(),
                })
                .collect(),
        }
    }
}

fn committed_from_stored(b: StoredBooking, items: Vec<StoredLineItem>) -> CommittedBooking {
    CommittedBooking {
        id: b.id,
        uuid: b.uuid,
        booking_reference: b.booking_reference,
        user_id: b.user_id,
        event_id: b.event_id,
        subtotal_minor: b.subtotal_minor,
        final_minor: b.final_minor,
        currency: b.currency,
        booking_status: BookingStatus::parse(&b.booking_status).unwrap_or(BookingStatus::Pending),
        payment_status: PaymentStatus::parse(&b.payment_status).unwrap_or(PaymentStatus::Pending),
        attendee: AttendeeInfo {
            name: b.attendee_name,
            email: b.attendee_email,
            phone: b.attendee_phone,
        },
        line_items: items
            .into_iter()
            .map(|i| CommittedLineItem {
                id: i.id,
                tier_id: i.tier_id,
                quantity: i.quantity,
                unit_price_minor: i.unit_price_minor,
            })
            .collect(),
    }
}
