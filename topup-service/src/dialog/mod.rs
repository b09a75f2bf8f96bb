//! Payment dialog state machine.
//!
//! Drives one top-up from QR generation to a paid, expired or failed outcome:
//!
//! ```text
//! Idle -> Generating -> Waiting -> Success | Expired | Error
//!                          ^                            |
//!                          +-------- retry() -----------+
//! ```
//!
//! While `Waiting`, two tasks run: a 1 Hz countdown and the status poller.
//! Both hang off a per-session [`CancellationToken`] and every mutation they
//! make is keyed on the session id captured when they were spawned, so a task
//! that outlives its session (closed or re-opened dialog) cannot touch state.

use crate::config::PollingConfig;
use crate::models::{PaymentOrder, PollUpdate, QrCode, QrResult, StatusResult};
use crate::services::paytm::PaymentGateway;
use crate::services::poller::{PollOutcome, Poller};
use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

pub const QR_READY_TOAST: &str = "🎮 QR Code generated! Scan to add battle funds";
pub const PAYMENT_SUCCESS_TOAST: &str = "🏆 Payment successful! Battle funds added!";
pub const GENERATION_FAILED_TOAST: &str = "Failed to generate QR code";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    Idle,
    Generating,
    Waiting,
    Success,
    Expired,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

/// Caller-side hooks of the dialog.
pub trait DialogCallbacks: Send + Sync {
    /// Called once per paid order, shortly before the dialog closes itself.
    fn on_success(&self, status: StatusResult);

    /// Called whenever an open dialog closes, by the user or after success.
    fn on_close(&self);

    fn on_toast(&self, toast: Toast) {
        match toast {
            Toast::Success(message) => tracing::info!(toast = %message, "Dialog notification"),
            Toast::Error(message) => tracing::warn!(toast = %message, "Dialog notification"),
        }
    }
}

/// Read-only view of everything the dialog displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogSnapshot {
    pub state: DialogState,
    pub amount: Option<u32>,
    pub order: Option<PaymentOrder>,
    pub qr: Option<QrCode>,
    pub countdown: u32,
    pub progress_percent: f64,
    pub status_message: String,
    pub error: Option<String>,
}

impl DialogSnapshot {
    fn idle(countdown: u32) -> Self {
        Self {
            state: DialogState::Idle,
            amount: None,
            order: None,
            qr: None,
            countdown,
            progress_percent: 0.0,
            status_message: String::new(),
            error: None,
        }
    }
}

struct Session {
    id: u64,
    snapshot: DialogSnapshot,
    cancel: Option<CancellationToken>,
    /// Confirmed payment not yet handed to `on_success`.
    paid: Option<StatusResult>,
}

struct DialogCore {
    gateway: Arc<dyn PaymentGateway>,
    callbacks: Arc<dyn DialogCallbacks>,
    config: PollingConfig,
    session: Mutex<Session>,
}

enum Tick {
    Continue,
    Expired,
    Stop,
}

impl DialogCore {
    fn lock(&self) -> MutexGuard<'_, Session> {
        // Callbacks run outside the lock, so a poisoned guard still holds a whole snapshot.
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs `f` against the snapshot only if `session` is still current.
    fn with_session<R>(&self, session: u64, f: impl FnOnce(&mut DialogSnapshot) -> R) -> Option<R> {
        let mut guard = self.lock();
        if guard.id != session {
            return None;
        }
        Some(f(&mut guard.snapshot))
    }

    /// Cancels whatever is running and starts a fresh session in `Generating`.
    /// Hands back a confirmed payment of the previous session that was not
    /// reported yet.
    fn begin(&self, amount: u32) -> (u64, CancellationToken, Option<StatusResult>) {
        let mut guard = self.lock();
        if let Some(previous) = guard.cancel.take() {
            previous.cancel();
        }

        guard.id += 1;
        let token = CancellationToken::new();
        guard.cancel = Some(token.clone());
        let unreported = guard.paid.take();
        guard.snapshot = DialogSnapshot {
            state: DialogState::Generating,
            amount: Some(amount),
            ..DialogSnapshot::idle(self.config.countdown_secs)
        };

        (guard.id, token, unreported)
    }

    async fn run_session(self: &Arc<Self>, amount: u32) {
        let (session, token, unreported) = self.begin(amount);
        if let Some(status) = unreported {
            self.callbacks.on_success(status);
        }
        tracing::info!(session, amount, "Payment dialog generating QR");

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            result = self.gateway.generate_payment_qr(amount, None) => result,
        };

        match result {
            QrResult::Generated(qr) => {
                let order_id = qr.order_id.clone();
                let applied = self.with_session(session, |snapshot| {
                    snapshot.state = DialogState::Waiting;
                    snapshot.order = Some(PaymentOrder {
                        order_id: qr.order_id.clone(),
                        amount: qr.amount,
                        created_at: Utc::now(),
                    });
                    snapshot.qr = Some(qr);
                });
                if applied.is_none() || token.is_cancelled() {
                    return;
                }

                tracing::info!(session, order_id = %order_id, "Payment dialog waiting for payment");
                self.callbacks
                    .on_toast(Toast::Success(QR_READY_TOAST.to_string()));

                let countdown = token.child_token();
                let polling = token.child_token();
                self.spawn_countdown(session, countdown.clone(), polling.clone());
                self.spawn_polling(session, order_id, token, countdown, polling);
            }
            QrResult::Failed { error } => {
                let applied = self.with_session(session, |snapshot| {
                    snapshot.state = DialogState::Error;
                    snapshot.error = Some(error.clone());
                });
                if applied.is_some() {
                    tracing::error!(session, error = %error, "Payment dialog QR generation failed");
                    self.callbacks
                        .on_toast(Toast::Error(GENERATION_FAILED_TOAST.to_string()));
                }
            }
        }
    }

    fn spawn_countdown(
        self: &Arc<Self>,
        session: u64,
        countdown: CancellationToken,
        polling: CancellationToken,
    ) {
        let core = Arc::clone(self);
        tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticker = interval_at(Instant::now() + period, period);

            loop {
                tokio::select! {
                    biased;
                    _ = countdown.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let tick = core.with_session(session, |snapshot| {
                    if snapshot.state != DialogState::Waiting {
                        return Tick::Stop;
                    }
                    snapshot.countdown = snapshot.countdown.saturating_sub(1);
                    if snapshot.countdown == 0 {
                        snapshot.state = DialogState::Expired;
                        Tick::Expired
                    } else {
                        Tick::Continue
                    }
                });

                match tick {
                    Some(Tick::Continue) => {}
                    Some(Tick::Expired) => {
                        tracing::info!(session, "Payment dialog expired");
                        polling.cancel();
                        break;
                    }
                    Some(Tick::Stop) | None => break,
                }
            }
        });
    }

    fn spawn_polling(
        self: &Arc<Self>,
        session: u64,
        order_id: String,
        token: CancellationToken,
        countdown: CancellationToken,
        polling: CancellationToken,
    ) {
        let core = Arc::clone(self);
        tokio::spawn(async move {
            let poller = Poller::from_config(&core.config);
            let gateway = Arc::clone(&core.gateway);

            let outcome = poller
                .poll(gateway.as_ref(), &order_id, &polling, |update| {
                    core.apply_poll_update(session, &countdown, update)
                })
                .await;

            match outcome {
                PollOutcome::Paid(_) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {}
                        _ = tokio::time::sleep(core.config.success_close_delay) => {
                            core.finish_success(session);
                        }
                    }
                }
                PollOutcome::Exhausted(_) => {
                    tracing::info!(session, order_id = %order_id, "Polling exhausted, waiting for countdown");
                }
                PollOutcome::Cancelled => {}
            }
        });
    }

    fn apply_poll_update(&self, session: u64, countdown: &CancellationToken, update: PollUpdate) {
        let paid = {
            let mut guard = self.lock();
            if guard.id != session || guard.snapshot.state != DialogState::Waiting {
                None
            } else {
                guard.snapshot.progress_percent = update.progress_percent;
                guard.snapshot.status_message = update.message.clone();
                if update.status.is_paid() {
                    guard.snapshot.state = DialogState::Success;
                    guard.paid = Some(update.status.clone());
                    Some(true)
                } else {
                    Some(false)
                }
            }
        };

        if paid == Some(true) {
            countdown.cancel();
            tracing::info!(session, attempt = update.attempt, "Payment dialog succeeded");
            self.callbacks
                .on_toast(Toast::Success(PAYMENT_SUCCESS_TOAST.to_string()));
        }
    }

    fn finish_success(&self, session: u64) {
        let paid = {
            let mut guard = self.lock();
            if guard.id != session || guard.snapshot.state != DialogState::Success {
                return;
            }
            guard.paid.take()
        };

        if let Some(status) = paid {
            self.callbacks.on_success(status);
        }
        self.close();
    }

    /// Tears down the current session. Returns whether the dialog was open,
    /// plus any confirmed payment that was not yet reported.
    fn teardown(&self) -> (bool, Option<StatusResult>) {
        let mut guard = self.lock();
        if let Some(token) = guard.cancel.take() {
            token.cancel();
        }
        guard.id += 1;
        let was_open = guard.snapshot.state != DialogState::Idle;
        let paid = guard.paid.take();
        guard.snapshot = DialogSnapshot::idle(self.config.countdown_secs);
        (was_open, paid)
    }

    /// Closing inside the success window still reports the payment, once,
    /// before `on_close`.
    fn close(&self) {
        let (was_open, paid) = self.teardown();
        if let Some(status) = paid {
            tracing::info!("Reporting confirmed payment on close");
            self.callbacks.on_success(status);
        }
        if was_open {
            tracing::info!("Payment dialog closed");
            self.callbacks.on_close();
        }
    }
}

/// The top-up dialog. Dropping it cancels any running session; only a
/// confirmed payment that was not reported yet reaches `on_success`.
pub struct PaymentDialog {
    core: Arc<DialogCore>,
}

impl PaymentDialog {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        callbacks: Arc<dyn DialogCallbacks>,
        config: PollingConfig,
    ) -> Self {
        let countdown = config.countdown_secs;
        Self {
            core: Arc::new(DialogCore {
                gateway,
                callbacks,
                config,
                session: Mutex::new(Session {
                    id: 0,
                    snapshot: DialogSnapshot::idle(countdown),
                    cancel: None,
                    paid: None,
                }),
            }),
        }
    }

    /// Opens (or re-opens) the dialog for `amount` and waits for QR generation.
    ///
    /// Any previous session is cancelled first. A zero amount leaves the
    /// dialog untouched.
    pub async fn open(&self, amount: u32) {
        if amount == 0 {
            tracing::debug!("Ignoring open with zero amount");
            return;
        }
        self.core.run_session(amount).await;
    }

    /// Regenerates the QR after a failed generation. Returns `false` when the
    /// dialog is not in the error state.
    pub async fn retry(&self) -> bool {
        let amount = {
            let guard = self.core.lock();
            match (guard.snapshot.state, guard.snapshot.amount) {
                (DialogState::Error, Some(amount)) => amount,
                _ => return false,
            }
        };

        tracing::info!(amount, "Retrying QR generation");
        self.core.run_session(amount).await;
        true
    }

    pub fn close(&self) {
        self.core.close();
    }

    pub fn snapshot(&self) -> DialogSnapshot {
        self.core.lock().snapshot.clone()
    }

    pub fn state(&self) -> DialogState {
        self.core.lock().snapshot.state
    }
}

impl Drop for PaymentDialog {
    fn drop(&mut self) {
        if let (_, Some(status)) = self.core.teardown() {
            self.core.callbacks.on_success(status);
        }
    }
}
