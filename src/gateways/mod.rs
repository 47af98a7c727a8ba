use anyhow::Result;

pub mod mock;
pub mod razorpay;

#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub order_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    /// Opens an order for the server-computed total. Nothing is captured
    /// yet; the buyer completes payment against this order id and the
    /// gateway reports back through the signed callback.
    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder>;
}
