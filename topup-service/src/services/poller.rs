//! Payment status polling.
//!
//! One polling session checks an order at a fixed interval until it is paid,
//! the attempt ceiling is reached, or the caller cancels. Cancellation is
//! cooperative: the token is checked before every update and every sleep, and
//! a status check still in flight when the token fires is dropped.

use crate::config::PollingConfig;
use crate::models::{PollUpdate, StatusResult};
use crate::services::metrics;
use crate::services::paytm::PaymentGateway;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

pub const VICTORY_MESSAGE: &str = "🎉 VICTORY! Payment successful - funds added to battle account!";

/// Rotated by attempt number while waiting for payment.
pub const SCANNING_MESSAGES: [&str; 8] = [
    "🔍 Scanning battlefield for payment...",
    "⚡ Detecting enemy transactions...",
    "🎯 Locking onto payment signal...",
    "🛡️ Verifying battle funds...",
    "🔥 Processing warrior payment...",
    "💎 Confirming diamond transaction...",
    "⚔️ Validating battle entry fee...",
    "🏆 Checking tournament registration...",
];

pub fn gaming_status_message(attempt: u32, status: &StatusResult) -> &'static str {
    if status.is_paid() {
        return VICTORY_MESSAGE;
    }
    SCANNING_MESSAGES[attempt as usize % SCANNING_MESSAGES.len()]
}

/// How a polling session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The gateway reported the order as paid.
    Paid(StatusResult),
    /// Every attempt was used without a paid status; carries the last result.
    Exhausted(StatusResult),
    /// The caller cancelled the session.
    Cancelled,
}

impl PollOutcome {
    pub fn last_status(&self) -> Option<&StatusResult> {
        match self {
            PollOutcome::Paid(status) | PollOutcome::Exhausted(status) => Some(status),
            PollOutcome::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    max_attempts: u32,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

impl Poller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(config.interval, config.max_attempts)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Polls `order_id` until paid, exhausted, or cancelled, reporting every
    /// attempt through `on_update`.
    ///
    /// A failed status check is not fatal; it is reported and counts as one
    /// attempt. Once `cancel` fires, `on_update` is never called again.
    pub async fn poll<G, F>(
        &self,
        gateway: &G,
        order_id: &str,
        cancel: &CancellationToken,
        mut on_update: F,
    ) -> PollOutcome
    where
        G: PaymentGateway + ?Sized,
        F: FnMut(PollUpdate),
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(order_id, attempt),
                status = gateway.check_payment_status(order_id) => status,
            };

            if cancel.is_cancelled() {
                return self.cancelled(order_id, attempt);
            }

            tracing::debug!(
                order_id = %order_id,
                attempt,
                max_attempts = self.max_attempts,
                success = status.is_success(),
                paid = status.is_paid(),
                "Payment status polled"
            );

            on_update(PollUpdate {
                attempt,
                max_attempts: self.max_attempts,
                progress_percent: f64::from(attempt) / f64::from(self.max_attempts) * 100.0,
                message: gaming_status_message(attempt, &status).to_string(),
                status: status.clone(),
            });

            if status.is_paid() {
                tracing::info!(order_id = %order_id, attempt, "Payment confirmed");
                metrics::record_poll_finished("paid");
                return PollOutcome::Paid(status);
            }

            if attempt >= self.max_attempts {
                tracing::info!(order_id = %order_id, attempt, "Payment polling exhausted");
                metrics::record_poll_finished("exhausted");
                return PollOutcome::Exhausted(status);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(order_id, attempt),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    fn cancelled(&self, order_id: &str, attempt: u32) -> PollOutcome {
        tracing::debug!(order_id = %order_id, attempt, "Payment polling cancelled");
        metrics::record_poll_finished("cancelled");
        PollOutcome::Cancelled
    }
}

/// Polls with the standard five second cadence.
pub async fn poll_payment_status<G, F>(
    gateway: &G,
    order_id: &str,
    on_update: F,
    max_attempts: u32,
    cancel: &CancellationToken,
) -> PollOutcome
where
    G: PaymentGateway + ?Sized,
    F: FnMut(PollUpdate),
{
    Poller::new(DEFAULT_POLL_INTERVAL, max_attempts)
        .poll(gateway, order_id, cancel, on_update)
        .await
}
