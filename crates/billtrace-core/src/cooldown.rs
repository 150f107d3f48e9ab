//! Cooldown policy gating repeat tracking of the same bill.
//!
//! The policy is a pure function of "now" and the serial number's last
//! tracked time. The caller owns atomicity: it must hold the serial's write
//! lock across read-last-event, `evaluate`, and append, otherwise two
//! concurrent requests can both observe "no recent event" and both be
//! accepted.

use chrono::{DateTime, Duration, Utc};

/// Outcome of evaluating the cooldown policy for a track request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// The request may be recorded.
    Accept,

    /// The request arrived inside the cooldown window.
    Reject {
        /// Whole seconds until the next request would be accepted,
        /// rounded up. Always greater than zero.
        remaining_seconds: u64,
    },
}

impl CooldownDecision {
    /// Returns `true` for [`CooldownDecision::Accept`].
    #[must_use]
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Evaluate whether a track request for a bill should be accepted.
///
/// - No prior event: accept.
/// - Elapsed time since the last event is at least `window`: accept.
/// - Otherwise: reject, reporting the remaining wait rounded up to whole
///   seconds.
#[must_use]
pub fn evaluate(
    now: DateTime<Utc>,
    last_tracked_at: Option<DateTime<Utc>>,
    window: Duration,
) -> CooldownDecision {
    let Some(last) = last_tracked_at else {
        return CooldownDecision::Accept;
    };

    let elapsed = now - last;
    if elapsed >= window {
        return CooldownDecision::Accept;
    }

    // Round sub-second remainders up so the reported wait is never short.
    let remaining_seconds = (window - elapsed)
        .num_milliseconds()
        .unsigned_abs()
        .div_ceil(1000)
        .max(1);

    CooldownDecision::Reject { remaining_seconds }
}
