//! Client location resolution.
//!
//! Always responds 200: provider failures are absorbed by the resolver's
//! fallback chain, never surfaced to the caller.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use billtrace_core::Location;
use billtrace_geo::Coordinates;

use crate::state::AppState;

/// Optional browser-reported coordinates.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// Latitude in decimal degrees.
    pub lat: Option<f64>,
    /// Longitude in decimal degrees.
    pub lon: Option<f64>,
}

/// Resolve the client's city and state.
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Json<Location> {
    let ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));

    let coordinates = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
        _ => None,
    };

    Json(state.resolver.resolve(ip, coordinates).await)
}

/// The client address: the first `X-Forwarded-For` hop when present
/// (the service is expected to sit behind a reverse proxy), otherwise the
/// peer address.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> IpAddr {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            if let Ok(ip) = first.trim().parse() {
                return ip;
            }
        }
    }

    peer.map_or(IpAddr::V4(Ipv4Addr::LOCALHOST), |addr| addr.ip())
}
