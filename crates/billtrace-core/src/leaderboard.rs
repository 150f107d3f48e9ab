//! Leaderboard aggregation.
//!
//! Both leaderboards are recomputed on demand from the store's full count
//! maps. This is a reporting path, not a hot path, so no incremental
//! maintenance is kept.

use std::collections::HashMap;

use serde::Serialize;

/// Default number of entries returned by [`top_tracked_bills`].
pub const DEFAULT_TOP_BILLS_LIMIT: usize = 10;

/// One row of the most-tracked-bills leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillCount {
    /// Serial number of the bill.
    pub serial_number: String,

    /// Number of accepted tracking events for the bill.
    pub tracked_count: u64,
}

/// One row of the most-tracked-cities leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    /// City name.
    pub city: String,

    /// State name.
    pub state: String,

    /// Number of tracking events recorded in the city.
    pub tracked_count: u64,
}

/// The most-tracked bills, descending by count.
///
/// Ties are broken by serial number ascending so the ordering is
/// deterministic. At most `limit` rows are returned.
#[must_use]
pub fn top_tracked_bills(counts: &HashMap<String, u64>, limit: usize) -> Vec<BillCount> {
    let mut rows: Vec<BillCount> = counts
        .iter()
        .map(|(serial, &count)| BillCount {
            serial_number: serial.clone(),
            tracked_count: count,
        })
        .collect();

    rows.sort_unstable_by(|a, b| {
        b.tracked_count
            .cmp(&a.tracked_count)
            .then_with(|| a.serial_number.cmp(&b.serial_number))
    });
    rows.truncate(limit);
    rows
}

/// Every city with at least one tracking event, descending by count.
///
/// Ties are broken by (city, state) ascending. No limit: the city list is
/// bounded by geography, not by event volume.
#[must_use]
pub fn tracked_cities(counts: &HashMap<(String, String), u64>) -> Vec<CityCount> {
    let mut rows: Vec<CityCount> = counts
        .iter()
        .map(|((city, state), &count)| CityCount {
            city: city.clone(),
            state: state.clone(),
            tracked_count: count,
        })
        .collect();

    rows.sort_unstable_by(|a, b| {
        b.tracked_count
            .cmp(&a.tracked_count)
            .then_with(|| a.city.cmp(&b.city))
            .then_with(|| a.state.cmp(&b.state))
    });
    rows
}
