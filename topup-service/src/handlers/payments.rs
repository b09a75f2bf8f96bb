use crate::dtos::{CoinQuoteQuery, CoinQuoteResponse, QrGenerateRequest};
use crate::models::{PaymentAmounts, QrResult, StatusResult};
use crate::services::coins::{amount_to_coins, bonus_percentage, format_inr, payment_amounts};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

pub async fn list_amounts() -> Json<PaymentAmounts> {
    Json(payment_amounts())
}

pub async fn quote_coins(
    Query(query): Query<CoinQuoteQuery>,
) -> Result<Json<CoinQuoteResponse>, AppError> {
    query.validate()?;

    Ok(Json(CoinQuoteResponse {
        amount: query.amount,
        coins: amount_to_coins(query.amount),
        bonus_percentage: bonus_percentage(query.amount),
        display: format_inr(u64::from(query.amount)),
    }))
}

/// Renders a payment QR. A gateway failure is reported as `502` with the
/// usual `{ success: false, error }` body.
pub async fn generate_qr(
    State(state): State<AppState>,
    Json(payload): Json<QrGenerateRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let result = state
        .gateway
        .generate_payment_qr(payload.amount, payload.order_id)
        .await;

    let status = match result {
        QrResult::Generated(_) => StatusCode::OK,
        QrResult::Failed { .. } => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(result)).into_response())
}

pub async fn payment_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Response, AppError> {
    if order_id.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("order id is required")));
    }

    let result = state.gateway.check_payment_status(&order_id).await;

    let status = match result {
        StatusResult::Checked { .. } => StatusCode::OK,
        StatusResult::Failed { .. } => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(result)).into_response())
}
