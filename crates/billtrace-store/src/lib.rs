//! Storage layer for billtrace.
//!
//! This crate provides the append-only tracking store behind a single
//! [`Store`] trait with two interchangeable backends:
//!
//! - [`JsonStore`]: two flat JSON files (`valid_bills.json`,
//!   `tracked_bills.json`), matching the original deployment format
//! - [`SqliteStore`]: an embedded relational database via `sqlx`
//!
//! The store itself never enforces the cooldown policy or referential
//! integrity; it is a dumb append log plus lookups. The service layer is
//! the sole gate for writes.
//!
//! # Example
//!
//! ```no_run
//! use billtrace_core::ValidBill;
//! use billtrace_store::{JsonStore, Store};
//!
//! # async fn example() -> billtrace_store::Result<()> {
//! let store = JsonStore::open("/var/lib/billtrace");
//! store
//!     .put_valid_bill(&ValidBill {
//!         serial_number: "AB12345678".into(),
//!         bill_value: 20,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod json;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use json::JsonStore;
pub use sqlite::SqliteStore;

use std::collections::HashMap;

use async_trait::async_trait;

use billtrace_core::{NewTrackingEvent, TrackingEvent, ValidBill};

/// The storage trait defining all persistence operations.
///
/// Implementations must be safe to share across request handlers. Append
/// durability is all-or-nothing: `append_event` either fully persists the
/// event or returns an error without partial effects.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Valid Bill Operations
    // =========================================================================

    /// Look up a registered bill by serial number.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get_valid_bill(&self, serial: &str) -> Result<Option<ValidBill>>;

    /// Register a bill (administrative import).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateSerial` if the serial number is
    /// already registered, or an error if the storage operation fails.
    async fn put_valid_bill(&self, bill: &ValidBill) -> Result<()>;

    // =========================================================================
    // Tracking Event Operations
    // =========================================================================

    /// Get the most recent tracking event for a serial number, by
    /// `recorded_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get_last_event(&self, serial: &str) -> Result<Option<TrackingEvent>>;

    /// Append a tracking event, assigning its id and `recorded_at`.
    ///
    /// The store does not check referential integrity or cooldowns; the
    /// caller is the gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn append_event(&self, event: NewTrackingEvent) -> Result<TrackingEvent>;

    /// Full tracking history for a serial number, descending by
    /// `recorded_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get_history(&self, serial: &str) -> Result<Vec<TrackingEvent>>;

    // =========================================================================
    // Aggregation Inputs
    // =========================================================================

    /// Number of tracking events per serial number.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn count_by_serial(&self) -> Result<HashMap<String, u64>>;

    /// Number of tracking events per (city, state) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn count_by_city_state(&self) -> Result<HashMap<(String, String), u64>>;
}
