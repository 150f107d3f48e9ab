//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{bills, health, leaderboards, location, track, valid_bills};
use crate::state::AppState;

/// Maximum concurrent requests for API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Tracking
/// - `POST /api/track-bill` - Record a bill sighting (cooldown-gated)
/// - `GET /api/bill/:serial` - Per-bill history and cooldown status
/// - `GET /api/valid-bill/:serial` - Registered-bill lookup
/// - `POST /api/valid-bills` - Register a bill (administrative import)
///
/// ## Statistics
/// - `GET /api/most_tracked_bills` - Top tracked bills
/// - `GET /api/most_tracked_cities` - Tracked cities
///
/// ## Location
/// - `GET /api/get-location` - Resolve the client's city/state
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Tracking
        .route("/track-bill", post(track::track_bill))
        .route("/bill/:serial", get(bills::get_bill))
        .route("/valid-bill/:serial", get(valid_bills::get_valid_bill))
        .route("/valid-bills", post(valid_bills::register_valid_bill))
        // Statistics
        .route("/most_tracked_bills", get(leaderboards::most_tracked_bills))
        .route("/most_tracked_cities", get(leaderboards::most_tracked_cities))
        // Location
        .route("/get-location", get(location::get_location))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no concurrency limit)
        .route("/health", get(health::health))
        // API routes
        .nest("/api", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
