use eventhive_bookings::gateways::mock::MockGateway;
use eventhive_bookings::gateways::{OrderRequest, PaymentGateway};

#[tokio::test]
async fn mock_gateway_opens_orders() {
    let gateway = MockGateway {
        behavior: "ALWAYS_SUCCESS".to_string(),
    };

    let order = gateway
        .create_order(OrderRequest {
            amount_minor: 100_000,
            currency: "INR".to_string(),
            receipt: "receipt_7_42_1".to_string(),
            notes: serde_json::json!({}),
        })
        .await
        .unwrap();

    assert!(order.order_id.starts_with("order_mock_"));
    assert_eq!(order.amount_minor, 100_000);
    assert_eq!(order.currency, "INR");
    assert_eq!(order.receipt, "receipt_7_42_1");
}

#[tokio::test]
async fn mock_gateway_can_decline() {
    let gateway = MockGateway {
        behavior: "ALWAYS_FAILURE".to_string(),
    };

    let err = gateway
        .create_order(OrderRequest {
            amount_minor: 100_000,
            currency: "INR".to_string(),
            receipt: "receipt_7_42_1".to_string(),
            notes: serde_json::json!({}),
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("declined"));
}
