//! Scriptable in-memory gateway for unit tests.

use crate::models::{PaymentStatus, QrCode, QrResult, StatusResult};
use crate::services::paytm::PaymentGateway;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Default)]
pub(crate) struct MockGateway {
    qr_results: Mutex<VecDeque<QrResult>>,
    paid_on_attempt: Option<(u32, f64)>,
    failing_checks: bool,
    hold_on: Option<u32>,
    generate_delay: Option<Duration>,
    checks: AtomicU32,
    generations: AtomicU32,
    generate_amounts: Mutex<Vec<u32>>,
    checked_orders: Mutex<Vec<String>>,
    held: Notify,
    release: Notify,
}

impl MockGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every check from attempt `attempt` onwards reports the order as paid.
    pub(crate) fn paid_on_attempt(mut self, attempt: u32, amount: f64) -> Self {
        self.paid_on_attempt = Some((attempt, amount));
        self
    }

    pub(crate) fn failing_checks(mut self) -> Self {
        self.failing_checks = true;
        self
    }

    /// The `attempt`-th check blocks until [`Self::release_held_check`].
    pub(crate) fn hold_check(mut self, attempt: u32) -> Self {
        self.hold_on = Some(attempt);
        self
    }

    pub(crate) fn generate_delay(mut self, delay: Duration) -> Self {
        self.generate_delay = Some(delay);
        self
    }

    /// Queued results returned by successive generations. Once drained,
    /// generation succeeds with image `"X"`.
    pub(crate) fn qr_results(self, results: Vec<QrResult>) -> Self {
        *self.qr_results.lock().unwrap() = results.into();
        self
    }

    pub(crate) fn status_checks(&self) -> u32 {
        self.checks.load(Ordering::SeqCst)
    }

    pub(crate) fn generate_amounts(&self) -> Vec<u32> {
        self.generate_amounts.lock().unwrap().clone()
    }

    pub(crate) fn checked_orders(&self) -> Vec<String> {
        self.checked_orders.lock().unwrap().clone()
    }

    pub(crate) async fn wait_for_held_check(&self) {
        self.held.notified().await;
    }

    pub(crate) fn release_held_check(&self) {
        self.release.notify_one();
    }
}

pub(crate) fn generated(image: &str, order_id: &str, amount: u32) -> QrResult {
    QrResult::Generated(QrCode {
        qr_image: image.to_string(),
        order_id: order_id.to_string(),
        amount,
        upi_payload: format!("upi://pay?tr={}", order_id),
    })
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn generate_payment_qr(&self, amount: u32, order_id: Option<String>) -> QrResult {
        let n = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        self.generate_amounts.lock().unwrap().push(amount);

        if let Some(delay) = self.generate_delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.qr_results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            let order_id = order_id.unwrap_or_else(|| format!("O{}", n));
            generated("X", &order_id, amount)
        })
    }

    async fn check_payment_status(&self, order_id: &str) -> StatusResult {
        let n = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
        self.checked_orders.lock().unwrap().push(order_id.to_string());

        if self.hold_on == Some(n) {
            self.held.notify_one();
            self.release.notified().await;
        }

        if self.failing_checks {
            return StatusResult::failed("connection refused");
        }

        match self.paid_on_attempt {
            Some((attempt, amount)) if n >= attempt => StatusResult::Checked {
                status: PaymentStatus {
                    is_paid: true,
                    amount_paid: amount,
                    transaction_id: Some(format!("TXN{}", n)),
                    message: "Txn Success".to_string(),
                },
                raw: json!({ "STATUS": "TXN_SUCCESS", "TXNAMOUNT": amount.to_string() }),
            },
            _ => StatusResult::Checked {
                status: PaymentStatus {
                    is_paid: false,
                    amount_paid: 0.0,
                    transaction_id: None,
                    message: "Pending".to_string(),
                },
                raw: json!({ "STATUS": "PENDING" }),
            },
        }
    }
}
