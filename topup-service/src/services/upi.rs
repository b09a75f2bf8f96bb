use crate::config::GatewayConfig;
use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ORDER_SUFFIX_LEN: usize = 5;

/// Builds the UPI intent encoded into the QR code.
///
/// Only the transaction reference varies per order; payee, name and note are
/// fixed by the gateway configuration.
pub fn generate_upi_link(config: &GatewayConfig, order_id: &str) -> String {
    // upi://pay?pa=...&pn=...&tr=...&tn=...
    format!(
        "upi://pay?pa={}&pn={}&tr={}&tn={}",
        config.payee_vpa, config.payee_name, order_id, config.txn_note
    )
}

/// Client-side order id: epoch millis followed by five base36 characters.
///
/// Uniqueness is best effort; the gateway is authoritative.
pub fn generate_order_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ORDER_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{}{}", Utc::now().timestamp_millis(), suffix)
}
