//! Nominatim reverse geocoding for client-supplied coordinates.
//!
//! Used when an interactive browser reports device coordinates. Unlike the
//! IP providers this reflects GPS or network-assisted positioning, so the
//! resolver marks its results as not approximate.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::provider::RawLocation;
use crate::resolver::Coordinates;

/// `address` object in a Nominatim reverse response. Smaller places report
/// `town` or `village` instead of `city`.
#[derive(Debug, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    address: Option<NominatimAddress>,
}

/// Reverse geocoding client for a Nominatim-compatible endpoint.
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a client against the given base URL.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            // Nominatim's usage policy requires an identifying agent.
            .user_agent(concat!("billtrace/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Try to reverse-geocode coordinates to a city and state. `None` on
    /// any failure.
    pub async fn attempt(&self, coordinates: Coordinates) -> Option<RawLocation> {
        let url = format!("{}/reverse", self.base_url);

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinates.lat.to_string()),
                ("lon", coordinates.lon.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(provider = "nominatim", error = %err, "Request failed");
                return None;
            }
        };

        let body: NominatimResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(provider = "nominatim", error = %err, "Unparseable response");
                return None;
            }
        };

        let Some(address) = body.address else {
            tracing::debug!(provider = "nominatim", "Response missing address data");
            return None;
        };

        let city = address
            .city
            .or(address.town)
            .or(address.village)
            .filter(|c| !c.is_empty())?;
        let region = address.state.filter(|s| !s.is_empty())?;

        Some(RawLocation { city, region })
    }
}
