//! Leaderboard handlers.
//!
//! Both boards are recomputed from the store on every request; this is a
//! reporting path and the event log is small.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use billtrace_core::{leaderboard, BillCount, CityCount, DEFAULT_TOP_BILLS_LIMIT};

use crate::error::ApiError;
use crate::state::AppState;

/// The top tracked bills, descending by count.
pub async fn most_tracked_bills(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BillCount>>, ApiError> {
    let counts = state.store.count_by_serial().await?;
    Ok(Json(leaderboard::top_tracked_bills(
        &counts,
        DEFAULT_TOP_BILLS_LIMIT,
    )))
}

/// Every tracked city, descending by count.
pub async fn most_tracked_cities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CityCount>>, ApiError> {
    let counts = state.store.count_by_city_state().await?;
    Ok(Json(leaderboard::tracked_cities(&counts)))
}
