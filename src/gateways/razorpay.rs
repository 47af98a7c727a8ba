use anyhow::{anyhow, Result};
use serde_json::json;

use crate::gateways::{GatewayOrder, OrderRequest, PaymentGateway};

pub struct RazorpayGateway {
    pub base_url: String,
    pub key_id: String,
    pub key_secret: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl PaymentGateway for RazorpayGateway {
    fn name(&self) -> &'static str {
        "razorpay"
    }

    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder> {
        let order_url = format!("{}/v1/orders", self.base_url);
        let body = json!({
            "amount": request.amount_minor,
            "currency": request.currency,
            "receipt": request.receipt,
            "payment_capture": 1,
            "notes": request.notes,
        });

        let resp = self
            .client
            .post(order_url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text: String = resp.text().await.unwrap_or_default().chars().take(200).collect();
            return Err(anyhow!("razorpay order rejected: HTTP_{} {}", status.as_u16(), text));
        }

        let v: serde_json::Value = resp.json().await?;
        let order_id = v
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| anyhow!("razorpay order response missing id"))?
            .to_string();

        Ok(GatewayOrder {
            order_id,
            amount_minor: request.amount_minor,
            currency: request.currency,
            receipt: request.receipt,
        })
    }
}
