//! Billtrace HTTP API Service.
//!
//! This crate provides the HTTP API for tracking serial-numbered bills,
//! including:
//!
//! - Track-bill submission, gated by the per-serial cooldown policy
//! - Per-bill history and valid-bill lookup
//! - Most-tracked-bills and most-tracked-cities leaderboards
//! - Client location resolution through the geolocation fallback chain
//!
//! # Write path
//!
//! The track-bill workflow is the only write path. It holds a per-serial
//! lock across read-last-event, cooldown evaluation, and append, so two
//! simultaneous submissions for the same bill cannot both slip inside the
//! cooldown window.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers without awaits keep async signatures
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod locks;
pub mod routes;
pub mod state;

pub use config::{ServiceConfig, StoreBackend};
pub use error::ApiError;
pub use locks::SerialLocks;
pub use routes::create_router;
pub use state::AppState;
