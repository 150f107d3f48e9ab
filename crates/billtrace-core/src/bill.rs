//! Bill and tracking-event types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered bill that may be tracked.
///
/// Valid bills are created by administrative import and are immutable
/// thereafter. A tracking event may only ever reference a serial number
/// present in this set; the service enforces that at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidBill {
    /// Unique alphanumeric serial number printed on the bill.
    pub serial_number: String,

    /// Denomination in whole dollars (e.g. 1, 5, 20).
    pub bill_value: u32,
}

/// A single recorded sighting of a bill.
///
/// Events are append-only: created exactly once per accepted track request,
/// never mutated or deleted. Ordering within a serial number's history is
/// by `recorded_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// Store-assigned autoincrementing identifier.
    pub id: i64,

    /// Serial number of the sighted bill.
    pub serial_number: String,

    /// City where the bill was sighted.
    pub city: String,

    /// State where the bill was sighted (full name).
    pub state: String,

    /// Date of the sighting as reported by the submitter.
    pub date: NaiveDate,

    /// Server timestamp assigned when the event was appended.
    pub recorded_at: DateTime<Utc>,
}

/// A tracking event as submitted, before the store assigns `id` and
/// `recorded_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrackingEvent {
    /// Serial number of the sighted bill.
    pub serial_number: String,

    /// City where the bill was sighted.
    pub city: String,

    /// State where the bill was sighted.
    pub state: String,

    /// Date of the sighting.
    pub date: NaiveDate,
}
