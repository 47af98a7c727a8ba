use chrono::{Duration, Utc};
use eventhive_bookings::domain::cart::{Cart, CartLine};
use eventhive_bookings::domain::error::CheckoutError;
use eventhive_bookings::repo::ticket_tiers_repo::TierSnapshot;
use eventhive_bookings::service::order_service::price_cart;

#[test]
fn totals_come_from_catalog_prices() {
    let tiers = vec![tier(1, 50_000, 10), tier(2, 120_000, 4)];
    let cart = Cart::new(vec![
        CartLine { tier_id: 1, quantity: 2 },
        CartLine { tier_id: 2, quantity: 1 },
    ])
    .unwrap();

    let priced = price_cart(&tiers, &cart, Utc::now()).unwrap();
    assert_eq!(priced.total_minor, 220_000);
    assert_eq!(priced.currency, "INR");
    assert_eq!(priced.lines.len(), 2);
    assert_eq!(priced.lines[0].unit_price_minor, 50_000);
    assert_eq!(priced.lines[0].line_total_minor, 100_000);
}

#[test]
fn rejects_tier_not_in_catalog() {
    let tiers = vec![tier(1, 50_000, 10)];
    let cart = Cart::new(vec![CartLine { tier_id: 99, quantity: 1 }]).unwrap();

    let err = price_cart(&tiers, &cart, Utc::now()).unwrap_err();
    assert!(matches!(err, CheckoutError::TierNotFound(99)));
}

#[test]
fn rejects_inactive_tier() {
    let mut inactive = tier(1, 50_000, 10);
    inactive.is_active = false;
    let cart = Cart::new(vec![CartLine { tier_id: 1, quantity: 1 }]).unwrap();

    let err = price_cart(&[inactive], &cart, Utc::now()).unwrap_err();
    assert!(matches!(err, CheckoutError::TierInactive(1)));
}

#[test]
fn rejects_tier_outside_sale_window() {
    let mut closed = tier(1, 50_000, 10);
    closed.sale_end_datetime = Utc::now() - Duration::hours(1);
    let cart = Cart::new(vec![CartLine { tier_id: 1, quantity: 1 }]).unwrap();

    let err = price_cart(&[closed], &cart, Utc::now()).unwrap_err();
    assert!(matches!(err, CheckoutError::TierInactive(1)));
}

#[test]
fn rejects_quantity_over_per_user_cap() {
    let tiers = vec![tier(1, 50_000, 10)];
    let cart = Cart::new(vec![CartLine { tier_id: 1, quantity: 6 }]).unwrap();

    let err = price_cart(&tiers, &cart, Utc::now()).unwrap_err();
    assert!(matches!(err, CheckoutError::QuantityExceedsCap(1)));
}

#[test]
fn soft_check_rejects_exhausted_tier() {
    let tiers = vec![tier(1, 50_000, 1)];
    let cart = Cart::new(vec![CartLine { tier_id: 1, quantity: 2 }]).unwrap();

    let err = price_cart(&tiers, &cart, Utc::now()).unwrap_err();
    assert!(matches!(err, CheckoutError::InsufficientInventory(1)));
}

#[test]
fn free_tier_prices_to_zero_total() {
    let tiers = vec![tier(1, 0, 10)];
    let cart = Cart::new(vec![CartLine { tier_id: 1, quantity: 3 }]).unwrap();

    let priced = price_cart(&tiers, &cart, Utc::now()).unwrap();
    assert_eq!(priced.total_minor, 0);
}

#[test]
fn rejects_mixed_currencies() {
    let mut usd = tier(2, 5_000, 10);
    usd.currency = "USD".to_string();
    let tiers = vec![tier(1, 50_000, 10), usd];
    let cart = Cart::new(vec![
        CartLine { tier_id: 1, quantity: 1 },
        CartLine { tier_id: 2, quantity: 1 },
    ])
    .unwrap();

    let err = price_cart(&tiers, &cart, Utc::now()).unwrap_err();
    assert!(matches!(err, CheckoutError::MixedCurrencyCart));
}

#[test]
fn cart_rejects_empty_and_malformed_input() {
    assert!(matches!(Cart::new(vec![]).unwrap_err(), CheckoutError::EmptyCart));
    assert!(matches!(
        Cart::new(vec![CartLine { tier_id: 1, quantity: 0 }]).unwrap_err(),
        CheckoutError::InvalidQuantity(1)
    ));
    assert!(matches!(
        Cart::new(vec![
            CartLine { tier_id: 1, quantity: 1 },
            CartLine { tier_id: 1, quantity: 2 },
        ])
        .unwrap_err(),
        CheckoutError::DuplicateCartLine(1)
    ));
}

fn tier(id: i64, price_minor: i64, remaining: i32) -> TierSnapshot {
    TierSnapshot {
        id,
        event_id: 7,
        name: format!("tier-{id}"),
        price_minor,
        currency: "INR".to_string(),
        total_quantity: 100,
        remaining_quantity: remaining,
        max_per_user: 5,
        is_active: true,
        sale_start_datetime: Utc::now() - Duration::days(1),
        sale_end_datetime: Utc::now() + Duration::days(1),
    }
}
