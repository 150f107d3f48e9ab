//! ipapi.co IP geolocation provider.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::provider::{LocationProvider, RawLocation};

/// Response body from `GET /{ip}/json/`.
///
/// ipapi.co reports errors as a 200 with an `error` flag, so that field is
/// checked alongside the location fields.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: Option<String>,
}

/// First provider in the chain: <https://ipapi.co>.
pub struct IpApiProvider {
    client: Client,
    base_url: String,
}

impl IpApiProvider {
    /// Create a provider against the given base URL (configurable so tests
    /// can point it at a mock server).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LocationProvider for IpApiProvider {
    fn name(&self) -> &'static str {
        "ipapi.co"
    }

    async fn attempt(&self, ip: IpAddr) -> Option<RawLocation> {
        let url = format!("{}/{}/json/", self.base_url, ip);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(provider = self.name(), error = %err, "Request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                provider = self.name(),
                status = %response.status(),
                "Non-success response"
            );
            return None;
        }

        let body: IpApiResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(provider = self.name(), error = %err, "Unparseable response");
                return None;
            }
        };

        if body.error {
            tracing::debug!(provider = self.name(), "Provider reported an error");
            return None;
        }

        match (body.city, body.region) {
            (Some(city), Some(region)) if !city.is_empty() && !region.is_empty() => {
                Some(RawLocation { city, region })
            }
            _ => {
                tracing::debug!(provider = self.name(), "Response missing city or region");
                None
            }
        }
    }
}
