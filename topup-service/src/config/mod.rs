use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub const DEFAULT_QR_API_BASE: &str = "https://qr.udayscriptsx.workers.dev/";
pub const DEFAULT_STATUS_API_BASE: &str = "https://paytm.udayscriptsx.workers.dev/";
pub const DEFAULT_MERCHANT_ID: &str = "UWjSzy23711328951174";
pub const DEFAULT_PAYEE_VPA: &str = "paytmqr281005050101nbxw0hx35cpo@paytm";
pub const DEFAULT_PAYEE_NAME: &str = "Paytm Merchant";
pub const DEFAULT_TXN_NOTE: &str = "Adding Fund";
pub const DEFAULT_QR_LOGO_URL: &str = "https://i.postimg.cc/cCrHr3TQ/1000011838-removebg.png";

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub qr_style: QrStyleConfig,
    pub polling: PollingConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Endpoints and payee details of the Paytm/UPI gateway.
#[derive(Deserialize, Clone, Debug)]
pub struct GatewayConfig {
    pub qr_api_base: String,
    pub status_api_base: String,
    pub merchant_id: Secret<String>,
    pub payee_vpa: String,
    pub payee_name: String,
    pub txn_note: String,
    pub http_timeout_secs: u64,
}

impl GatewayConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            qr_api_base: DEFAULT_QR_API_BASE.to_string(),
            status_api_base: DEFAULT_STATUS_API_BASE.to_string(),
            merchant_id: Secret::new(DEFAULT_MERCHANT_ID.to_string()),
            payee_vpa: DEFAULT_PAYEE_VPA.to_string(),
            payee_name: DEFAULT_PAYEE_NAME.to_string(),
            txn_note: DEFAULT_TXN_NOTE.to_string(),
            http_timeout_secs: 15,
        }
    }
}

/// Visual parameters forwarded verbatim to the QR rendering endpoint.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct QrStyleConfig {
    pub body: String,
    pub eye: String,
    pub eyeball: String,
    pub col1: String,
    pub col2: String,
    pub logo: String,
}

impl Default for QrStyleConfig {
    fn default() -> Self {
        Self {
            body: "dot".to_string(),
            eye: "frame13".to_string(),
            eyeball: "ball14".to_string(),
            col1: "121f28".to_string(),
            col2: "121f28".to_string(),
            logo: DEFAULT_QR_LOGO_URL.to_string(),
        }
    }
}

/// Cadence of a payment session. The countdown and the poll ceiling must
/// describe the same wall-clock window.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PollingConfig {
    pub interval: Duration,
    pub max_attempts: u32,
    pub countdown_secs: u32,
    pub success_close_delay: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
            countdown_secs: 300,
            success_close_delay: Duration::from_secs(2),
        }
    }
}

impl PollingConfig {
    /// Total time the poller may run before giving up.
    pub fn poll_window(&self) -> Duration {
        self.interval * self.max_attempts
    }

    pub fn countdown_window(&self) -> Duration {
        Duration::from_secs(u64::from(self.countdown_secs))
    }
}

/// Gateway timeout in whole seconds. Unset means `default`; a zero or
/// unparsable value is an error.
fn parse_timeout_secs(raw: Option<String>, default: u64) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("TOPUP_HTTP_TIMEOUT_SECS is not a number: {:?}", raw))?;
    if secs == 0 {
        bail!("TOPUP_HTTP_TIMEOUT_SECS must be at least 1");
    }
    Ok(secs)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("TOPUP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("TOPUP_PORT")
            .unwrap_or_else(|_| "3010".to_string())
            .parse()?;

        let defaults = GatewayConfig::default();
        let gateway = GatewayConfig {
            qr_api_base: env::var("TOPUP_QR_API_BASE").unwrap_or(defaults.qr_api_base),
            status_api_base: env::var("TOPUP_STATUS_API_BASE")
                .unwrap_or(defaults.status_api_base),
            merchant_id: env::var("TOPUP_MERCHANT_ID")
                .map(Secret::new)
                .unwrap_or(defaults.merchant_id),
            payee_vpa: env::var("TOPUP_PAYEE_VPA").unwrap_or(defaults.payee_vpa),
            payee_name: env::var("TOPUP_PAYEE_NAME").unwrap_or(defaults.payee_name),
            txn_note: env::var("TOPUP_TXN_NOTE").unwrap_or(defaults.txn_note),
            http_timeout_secs: parse_timeout_secs(
                env::var("TOPUP_HTTP_TIMEOUT_SECS").ok(),
                defaults.http_timeout_secs,
            )?,
        };

        let mut qr_style = QrStyleConfig::default();
        if let Ok(logo) = env::var("TOPUP_QR_LOGO_URL") {
            qr_style.logo = logo;
        }

        Ok(Self {
            server: ServerConfig { host, port },
            gateway,
            qr_style,
            polling: PollingConfig::default(),
            service_name: "topup-service".to_string(),
        })
    }
}
