pub mod config;
pub mod domain {
    pub mod booking;
    pub mod cart;
    pub mod error;
}
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod bookings;
        pub mod catalog;
        pub mod checkout;
        pub mod ops;
        pub mod payments;
        pub mod tickets;
    }
    pub mod middleware {
        pub mod admin_auth;
        pub mod rate_limit;
    }
}
pub mod repo {
    pub mod bookings_repo;
    pub mod events_repo;
    pub mod outbox_repo;
    pub mod payments_repo;
    pub mod ticket_tiers_repo;
    pub mod tickets_repo;
}
pub mod service {
    pub mod booking_service;
    pub mod committer;
    pub mod notification;
    pub mod order_service;
    pub mod order_store;
    pub mod outbox_relay;
    pub mod ticket_issuer;
    pub mod verifier;
}

#[derive(Clone)]
pub struct AppState {
    pub booking_service: service::booking_service::BookingService,
    pub tiers_repo: repo::ticket_tiers_repo::TicketTiersRepo,
    pub tickets_repo: repo::tickets_repo::TicketsRepo,
    pub redis_client: redis::Client,
}
