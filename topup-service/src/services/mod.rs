pub mod coins;
pub mod metrics;
pub mod paytm;
pub mod poller;
pub mod upi;

#[cfg(test)]
pub(crate) mod testing;

pub use metrics::{get_metrics, init_metrics};
pub use paytm::{PaymentGateway, PaytmClient};
pub use poller::{poll_payment_status, PollOutcome, Poller};
