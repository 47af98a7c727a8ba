use anyhow::{anyhow, Result};

use crate::gateways::{GatewayOrder, OrderRequest, PaymentGateway};

/// Stand-in adapter for local runs and tests; no credentials or network.
pub struct MockGateway {
    pub behavior: String,
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder> {
        match self.behavior.as_str() {
            "ALWAYS_FAILURE" => Err(anyhow!("mock gateway declined order")),
            _ => Ok(GatewayOrder {
                order_id: format!("order_mock_{}", uuid::Uuid::new_v4().simple()),
                amount_minor: request.amount_minor,
                currency: request.currency,
                receipt: request.receipt,
            }),
        }
    }
}
