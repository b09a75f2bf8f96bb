use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A QR top-up order. Lives only as long as its polling session; the
/// gateway is the system of record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: u32,
    pub created_at: DateTime<Utc>,
}

/// A rendered QR code for one order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QrCode {
    pub qr_image: String,
    pub order_id: String,
    pub amount: u32,
    pub upi_payload: String,
}

/// Outcome of a QR generation call. Serialises to the flat
/// `{ success, ... }` shape clients expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "QrResultBody")]
pub enum QrResult {
    Generated(QrCode),
    Failed { error: String },
}

impl QrResult {
    pub fn failed(error: impl Into<String>) -> Self {
        QrResult::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QrResult::Generated(_))
    }
}

#[derive(Serialize)]
struct QrResultBody {
    success: bool,
    #[serde(flatten)]
    qr: Option<QrCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<QrResult> for QrResultBody {
    fn from(result: QrResult) -> Self {
        match result {
            QrResult::Generated(qr) => QrResultBody {
                success: true,
                qr: Some(qr),
                error: None,
            },
            QrResult::Failed { error } => QrResultBody {
                success: false,
                qr: None,
                error: Some(error),
            },
        }
    }
}

/// Payment state of an order as reported by the gateway.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaymentStatus {
    pub is_paid: bool,
    pub amount_paid: f64,
    pub transaction_id: Option<String>,
    pub message: String,
}

/// Outcome of a single status lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "StatusResultBody")]
pub enum StatusResult {
    Checked {
        status: PaymentStatus,
        raw: serde_json::Value,
    },
    Failed {
        error: String,
    },
}

impl StatusResult {
    pub fn failed(error: impl Into<String>) -> Self {
        StatusResult::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusResult::Checked { .. })
    }

    /// A failed lookup never counts as paid.
    pub fn is_paid(&self) -> bool {
        matches!(self, StatusResult::Checked { status, .. } if status.is_paid)
    }

    pub fn status(&self) -> Option<&PaymentStatus> {
        match self {
            StatusResult::Checked { status, .. } => Some(status),
            StatusResult::Failed { .. } => None,
        }
    }
}

#[derive(Serialize)]
struct StatusResultBody {
    success: bool,
    #[serde(flatten)]
    status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<StatusResult> for StatusResultBody {
    fn from(result: StatusResult) -> Self {
        match result {
            StatusResult::Checked { status, raw } => StatusResultBody {
                success: true,
                status: Some(status),
                data: Some(raw),
                error: None,
            },
            StatusResult::Failed { error } => StatusResultBody {
                success: false,
                status: None,
                data: None,
                error: Some(error),
            },
        }
    }
}

/// Progress report emitted once per polling attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollUpdate {
    pub attempt: u32,
    pub max_attempts: u32,
    pub progress_percent: f64,
    pub status: StatusResult,
    pub message: String,
}

/// A preset top-up amount shown in the wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentPack {
    pub amount: u32,
    pub label: &'static str,
    pub description: &'static str,
    pub coins: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentAmounts {
    pub quick: Vec<PaymentPack>,
    pub popular: Vec<PaymentPack>,
}
