//! Core types and pure logic for billtrace.
//!
//! This crate provides the foundational pieces shared by the store, the
//! location resolver, and the HTTP service:
//!
//! - **Bills**: `ValidBill`, `TrackingEvent`, `NewTrackingEvent`
//! - **Cooldown**: the pure accept/reject policy gating repeat sightings
//! - **Aggregation**: leaderboard sorting for bills and cities
//! - **Location**: the resolved city/state value produced per request
//!
//! Everything here is side-effect free. Clock access, storage, and network
//! calls live in the crates that depend on this one, which keeps the policy
//! and aggregation logic independently testable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bill;
pub mod cooldown;
pub mod leaderboard;
pub mod location;

pub use bill::{NewTrackingEvent, TrackingEvent, ValidBill};
pub use cooldown::{evaluate, CooldownDecision};
pub use leaderboard::{
    top_tracked_bills, tracked_cities, BillCount, CityCount, DEFAULT_TOP_BILLS_LIMIT,
};
pub use location::Location;
