//! The track-bill workflow.
//!
//! This is the only write path in the service and the sole gate for the
//! data-model invariants: referential integrity (the serial must be
//! registered) and cooldown separation between consecutive events of the
//! same bill. Both are enforced here, not in the store.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use billtrace_core::{cooldown, CooldownDecision, NewTrackingEvent};

use crate::error::ApiError;
use crate::state::AppState;

/// Track request, in the original wire format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBillRequest {
    /// Serial number of the sighted bill.
    pub serial_number: String,
    /// City of the sighting.
    pub city: String,
    /// State of the sighting.
    pub state: String,
    /// Date of the sighting, `YYYY-MM-DD`.
    pub date: String,
}

/// Track response on accept.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBillResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Full cooldown window now in effect for this serial, in seconds.
    pub cooldown_seconds: u64,
    /// Page showing the bill's history.
    pub redirect: String,
}

/// Record a bill sighting.
pub async fn track_bill(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TrackBillRequest>,
) -> Result<Json<TrackBillResponse>, ApiError> {
    let serial = body.serial_number.trim();
    let city = body.city.trim();
    let region = body.state.trim();

    if serial.is_empty() || city.is_empty() || region.is_empty() || body.date.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    }

    let date = NaiveDate::parse_from_str(body.date.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("Invalid date, expected YYYY-MM-DD".into()))?;

    // Unregistered serials are a client error on this path; 404 is
    // reserved for the GET lookups.
    if state.store.get_valid_bill(serial).await?.is_none() {
        return Err(ApiError::BadRequest(format!(
            "Serial number is not registered: {serial}"
        )));
    }

    // Hold the serial's lock across check-then-append so two concurrent
    // submissions cannot both pass the cooldown check.
    let _guard = state.serial_locks.acquire(serial).await;

    let last = state.store.get_last_event(serial).await?;
    let window = state.config.cooldown_window();

    match cooldown::evaluate(chrono::Utc::now(), last.map(|e| e.recorded_at), window) {
        CooldownDecision::Accept => {}
        CooldownDecision::Reject { remaining_seconds } => {
            tracing::debug!(
                serial = %serial,
                remaining_seconds,
                "Track request rejected by cooldown policy"
            );
            return Err(ApiError::CooldownActive { remaining_seconds });
        }
    }

    let event = state
        .store
        .append_event(NewTrackingEvent {
            serial_number: serial.to_string(),
            city: city.to_string(),
            state: region.to_string(),
            date,
        })
        .await?;

    tracing::info!(
        serial = %event.serial_number,
        city = %event.city,
        state = %event.state,
        "Bill tracked"
    );

    Ok(Json(TrackBillResponse {
        message: "Bill tracked successfully".to_string(),
        cooldown_seconds: window.num_seconds().unsigned_abs(),
        redirect: format!("/bill/{}", event.serial_number),
    }))
}
