use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct QrGenerateRequest {
    #[validate(range(min = 1, message = "amount must be at least 1 rupee"))]
    pub amount: u32,
    #[validate(length(min = 1, max = 64))]
    pub order_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CoinQuoteQuery {
    #[validate(range(min = 1))]
    pub amount: u32,
}

#[derive(Debug, Serialize)]
pub struct CoinQuoteResponse {
    pub amount: u32,
    pub coins: u64,
    pub bonus_percentage: u32,
    pub display: String,
}
