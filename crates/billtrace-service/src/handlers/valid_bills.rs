//! Valid-bill lookup and administrative import.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use billtrace_core::ValidBill;

use crate::error::ApiError;
use crate::state::AppState;

/// Look up a registered bill. Responds with the stored record
/// (`serial_number`, `bill_value`).
pub async fn get_valid_bill(
    State(state): State<Arc<AppState>>,
    Path(serial): Path<String>,
) -> Result<Json<ValidBill>, ApiError> {
    match state.store.get_valid_bill(&serial).await? {
        Some(bill) => Ok(Json(bill)),
        None => Err(ApiError::NotFound(format!("unknown serial: {serial}"))),
    }
}

/// Registration request (administrative import).
#[derive(Debug, Deserialize)]
pub struct RegisterBillRequest {
    /// Serial number to register.
    pub serial_number: String,
    /// Denomination in dollars.
    pub bill_value: u32,
}

/// Register a bill so it can be tracked.
pub async fn register_valid_bill(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBillRequest>,
) -> Result<Json<ValidBill>, ApiError> {
    let serial = body.serial_number.trim();

    if serial.is_empty() {
        return Err(ApiError::BadRequest("Missing serial number".into()));
    }
    if body.bill_value == 0 {
        return Err(ApiError::BadRequest(
            "Bill value must be a positive dollar amount".into(),
        ));
    }

    let bill = ValidBill {
        serial_number: serial.to_string(),
        bill_value: body.bill_value,
    };
    state.store.put_valid_bill(&bill).await?;

    tracing::info!(serial = %bill.serial_number, value = bill.bill_value, "Registered bill");
    Ok(Json(bill))
}
