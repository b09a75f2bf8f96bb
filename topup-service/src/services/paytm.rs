//! Paytm UPI gateway client.
//!
//! Talks to two external endpoints: a QR renderer that turns a UPI intent into
//! an image, and a status lookup keyed by merchant id and order id. Every
//! failure is converted into a typed `{ success: false, error }` result here;
//! nothing past this boundary sees an `Err` from the network.

use crate::config::{GatewayConfig, QrStyleConfig};
use crate::models::{PaymentStatus, QrCode, QrResult, StatusResult};
use crate::services::metrics;
use crate::services::upi::{generate_order_id, generate_upi_link};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;

/// Gateway status value marking a settled payment.
pub const TXN_SUCCESS: &str = "TXN_SUCCESS";

/// Abstraction over the QR and status endpoints.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Render a QR for `amount`. A fresh order id is minted when none is given.
    async fn generate_payment_qr(&self, amount: u32, order_id: Option<String>) -> QrResult;

    /// Look up the payment state of one order.
    async fn check_payment_status(&self, order_id: &str) -> StatusResult;
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("amount must be a positive number of rupees")]
    InvalidAmount,

    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to generate QR code")]
    MissingImage,
}

#[derive(Debug, Deserialize)]
struct QrRenderResponse {
    image: Option<String>,
}

#[derive(Clone)]
pub struct PaytmClient {
    client: Client,
    gateway: GatewayConfig,
    style: QrStyleConfig,
}

impl PaytmClient {
    pub fn new(gateway: GatewayConfig, style: QrStyleConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(gateway.http_timeout()).build()?;
        Ok(Self {
            client,
            gateway,
            style,
        })
    }

    async fn render_qr(&self, upi_payload: &str) -> Result<String, PaymentError> {
        let query = [
            ("data", upi_payload),
            ("body", self.style.body.as_str()),
            ("eye", self.style.eye.as_str()),
            ("eyeball", self.style.eyeball.as_str()),
            ("col1", self.style.col1.as_str()),
            ("col2", self.style.col2.as_str()),
            ("logo", self.style.logo.as_str()),
        ];

        let response = self
            .client
            .get(&self.gateway.qr_api_base)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let rendered: QrRenderResponse = serde_json::from_str(&body)?;

        rendered
            .image
            .filter(|image| !image.is_empty())
            .ok_or(PaymentError::MissingImage)
    }

    async fn fetch_status(&self, order_id: &str) -> Result<Value, PaymentError> {
        let response = self
            .client
            .get(&self.gateway.status_api_base)
            .query(&[
                ("mid", self.gateway.merchant_id.expose_secret().as_str()),
                ("id", order_id),
            ])
            .send()
            .await?;

        // Unlike the renderer, a non-2xx status with a JSON body is still a readable report.
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, order_id = %order_id, "Paytm status response");
        if !status.is_success() {
            tracing::warn!(status = %status, order_id = %order_id, "Paytm status endpoint returned non-success");
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PaymentGateway for PaytmClient {
    async fn generate_payment_qr(&self, amount: u32, order_id: Option<String>) -> QrResult {
        if amount == 0 {
            metrics::record_qr_generation("invalid");
            return QrResult::failed(PaymentError::InvalidAmount.to_string());
        }

        let order_id = order_id.unwrap_or_else(generate_order_id);
        let upi_payload = generate_upi_link(&self.gateway, &order_id);

        match self.render_qr(&upi_payload).await {
            Ok(qr_image) => {
                tracing::info!(order_id = %order_id, amount, "QR code generated");
                metrics::record_qr_generation("success");
                QrResult::Generated(QrCode {
                    qr_image,
                    order_id,
                    amount,
                    upi_payload,
                })
            }
            Err(e) => {
                tracing::error!(order_id = %order_id, amount, error = %e, "QR generation failed");
                metrics::record_qr_generation("failure");
                QrResult::failed(e.to_string())
            }
        }
    }

    async fn check_payment_status(&self, order_id: &str) -> StatusResult {
        match self.fetch_status(order_id).await {
            Ok(raw) => {
                let status = map_status(&raw);
                metrics::record_status_check(if status.is_paid { "paid" } else { "pending" });
                StatusResult::Checked { status, raw }
            }
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "Payment status check failed");
                metrics::record_status_check("failure");
                StatusResult::failed(e.to_string())
            }
        }
    }
}

/// Maps the gateway's raw payload (`STATUS`, `TXNAMOUNT`, `TXNID`, `RESPMSG`)
/// onto a [`PaymentStatus`].
pub fn map_status(raw: &Value) -> PaymentStatus {
    let is_paid = raw.get("STATUS").and_then(Value::as_str) == Some(TXN_SUCCESS);

    // Paytm reports amounts as strings ("500.00"); accept plain numbers too.
    let amount_paid = match raw.get("TXNAMOUNT") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };

    let transaction_id = raw
        .get("TXNID")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    let message = raw
        .get("RESPMSG")
        .and_then(Value::as_str)
        .unwrap_or("Unknown status")
        .to_string();

    PaymentStatus {
        is_paid,
        amount_paid,
        transaction_id,
        message,
    }
}
