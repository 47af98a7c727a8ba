use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use eventhive_bookings::config::AppConfig;
use eventhive_bookings::gateways::mock::MockGateway;
use eventhive_bookings::gateways::razorpay::RazorpayGateway;
use eventhive_bookings::gateways::PaymentGateway;
use eventhive_bookings::repo::bookings_repo::BookingsRepo;
use eventhive_bookings::repo::events_repo::EventsRepo;
use eventhive_bookings::repo::outbox_repo::OutboxRepo;
use eventhive_bookings::repo::ticket_tiers_repo::TicketTiersRepo;
use eventhive_bookings::repo::tickets_repo::TicketsRepo;
use eventhive_bookings::service::booking_service::BookingService;
use eventhive_bookings::service::committer::BookingCommitter;
use eventhive_bookings::service::notification::NotificationDispatcher;
use eventhive_bookings::service::order_service::OrderService;
use eventhive_bookings::service::order_store::OrderContextStore;
use eventhive_bookings::service::outbox_relay::OutboxRelay;
use eventhive_bookings::service::ticket_issuer::TicketIssuer;
use eventhive_bookings::AppState;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;

    let events_repo = EventsRepo { pool: pool.clone() };
    let tiers_repo = TicketTiersRepo { pool: pool.clone() };
    let bookings_repo = BookingsRepo { pool: pool.clone() };
    let tickets_repo = TicketsRepo { pool: pool.clone() };
    let outbox_repo = OutboxRepo { pool: pool.clone() };

    let razorpay_key_id = std::env::var("RAZORPAY_KEY_ID").unwrap_or_default();
    let razorpay_key_secret = std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_default();
    let gateway: Arc<dyn PaymentGateway> = if cfg.gateway_adapter == "MOCK" {
        Arc::new(MockGateway {
            behavior: std::env::var("MOCK_GATEWAY_BEHAVIOR")
                .unwrap_or_else(|_| "ALWAYS_SUCCESS".to_string()),
        })
    } else {
        Arc::new(RazorpayGateway {
            base_url: std::env::var("RAZORPAY_BASE_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
            key_id: razorpay_key_id.clone(),
            key_secret: razorpay_key_secret.clone(),
            timeout_ms: std::env::var("GATEWAY_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(2500),
            client: reqwest::Client::new(),
        })
    };

    let order_store = OrderContextStore {
        redis_client: redis::Client::open(cfg.redis_url.clone())?,
        ttl_secs: cfg.order_ttl_secs,
    };

    let booking_service = BookingService {
        order_service: OrderService {
            events_repo: events_repo.clone(),
            tiers_repo: tiers_repo.clone(),
            order_store: order_store.clone(),
            gateway,
        },
        committer: BookingCommitter {
            pool: pool.clone(),
            outbox_repo: outbox_repo.clone(),
        },
        ticket_issuer: TicketIssuer {
            tickets_repo: tickets_repo.clone(),
            ticket_secret: cfg.ticket_secret.clone(),
            app_base_url: cfg.app_base_url.clone(),
        },
        dispatcher: NotificationDispatcher {
            client: reqwest::Client::new(),
            endpoint: cfg.notify_endpoint.clone(),
        },
        order_store,
        events_repo,
        bookings_repo,
        callback_secret: razorpay_key_secret,
        razorpay_key_id,
    };

    let relay = OutboxRelay {
        outbox_repo,
        redis_client: redis::Client::open(cfg.redis_url.clone())?,
        stream_key: cfg.stream_key.clone(),
    };
    tokio::spawn(relay.run());

    let state = AppState {
        booking_service,
        tiers_repo,
        tickets_repo,
        redis_client,
    };

    let admin_key = cfg.internal_api_key.clone();
    let admin_routes = Router::new()
        .route(
            "/bookings/:reference/reissue",
            post(eventhive_bookings::http::handlers::bookings::reissue_tickets),
        )
        .route(
            "/bookings/:reference/cancel",
            post(eventhive_bookings::http::handlers::bookings::cancel_booking),
        )
        .layer(from_fn_with_state(
            admin_key,
            eventhive_bookings::http::middleware::admin_auth::require_internal_api_key,
        ));

    let app = Router::new()
        .route("/health", get(eventhive_bookings::http::handlers::checkout::health))
        .route(
            "/checkout/orders",
            post(eventhive_bookings::http::handlers::checkout::open_checkout),
        )
        .route(
            "/payments/razorpay/callback",
            post(eventhive_bookings::http::handlers::payments::razorpay_callback),
        )
        .route(
            "/events/:event_id/tiers",
            get(eventhive_bookings::http::handlers::catalog::list_tiers),
        )
        .route(
            "/bookings/:reference",
            get(eventhive_bookings::http::handlers::bookings::get_booking),
        )
        .route(
            "/tickets/verify/:token",
            get(eventhive_bookings::http::handlers::tickets::verify_ticket),
        )
        .route("/ops/readiness", get(eventhive_bookings::http::handlers::ops::readiness))
        .route("/ops/liveness", get(eventhive_bookings::http::handlers::ops::liveness))
        .merge(admin_routes)
        .layer(from_fn_with_state(
            eventhive_bookings::http::middleware::rate_limit::RateLimitState {
                redis_client: redis::Client::open(cfg.redis_url.clone())?,
                max_per_minute: 120,
            },
            eventhive_bookings::http::middleware::rate_limit::enforce,
        ))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
