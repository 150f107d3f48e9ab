//! Resolved location value.

use serde::{Deserialize, Serialize};

/// A city/state location resolved for a client.
///
/// Produced fresh per request by the location resolver and never persisted;
/// the resolver may cache it per client address for a bounded TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// City name.
    pub city: String,

    /// State name, expanded to the full form (never a 2-letter code).
    pub state: String,

    /// Whether the location was inferred from the client's IP address
    /// rather than device-reported coordinates.
    pub approximate: bool,
}

impl Location {
    /// The fixed fallback returned when every provider fails.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            city: "New York".to_string(),
            state: "New York".to_string(),
            approximate: true,
        }
    }
}
