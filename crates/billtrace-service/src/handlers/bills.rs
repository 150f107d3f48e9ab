//! Per-bill history lookup.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use billtrace_core::{cooldown, CooldownDecision, TrackingEvent};

use crate::error::ApiError;
use crate::state::AppState;

/// One sighting in a bill's history, in the original wire format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// City of the sighting.
    pub city: String,
    /// State of the sighting.
    pub state: String,
    /// Date of the sighting.
    pub date: NaiveDate,
    /// Server timestamp of the sighting.
    pub recorded_at: DateTime<Utc>,
}

impl From<TrackingEvent> for HistoryEntry {
    fn from(event: TrackingEvent) -> Self {
        Self {
            city: event.city,
            state: event.state,
            date: event.date,
            recorded_at: event.recorded_at,
        }
    }
}

/// Bill lookup response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    /// Sightings, most recent first.
    pub tracked_history: Vec<HistoryEntry>,
    /// Number of sightings.
    pub tracked_count: usize,
    /// Denomination in dollars.
    pub bill_value: u32,
    /// Seconds until the bill may be tracked again; 0 when the cooldown
    /// has lapsed.
    pub cooldown_seconds: u64,
}

/// Get a bill's tracking history and cooldown status.
pub async fn get_bill(
    State(state): State<Arc<AppState>>,
    Path(serial): Path<String>,
) -> Result<Json<BillResponse>, ApiError> {
    let Some(bill) = state.store.get_valid_bill(&serial).await? else {
        return Err(ApiError::NotFound(format!("unknown serial: {serial}")));
    };

    let history = state.store.get_history(&serial).await?;

    let cooldown_seconds = match cooldown::evaluate(
        Utc::now(),
        history.first().map(|e| e.recorded_at),
        state.config.cooldown_window(),
    ) {
        CooldownDecision::Accept => 0,
        CooldownDecision::Reject { remaining_seconds } => remaining_seconds,
    };

    Ok(Json(BillResponse {
        tracked_count: history.len(),
        tracked_history: history.into_iter().map(HistoryEntry::from).collect(),
        bill_value: bill.bill_value,
        cooldown_seconds,
    }))
}
