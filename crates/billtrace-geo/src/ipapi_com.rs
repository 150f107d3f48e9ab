//! ip-api.com IP geolocation provider.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::provider::{LocationProvider, RawLocation};

/// Response body from `GET /json/{ip}`.
///
/// ip-api.com signals failure through `"status": "fail"` rather than an
/// HTTP error.
#[derive(Debug, Deserialize)]
struct IpApiComResponse {
    status: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(rename = "regionName", default)]
    region_name: Option<String>,
}

/// Second provider in the chain: <http://ip-api.com>.
pub struct IpApiComProvider {
    client: Client,
    base_url: String,
}

impl IpApiComProvider {
    /// Create a provider against the given base URL.
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
impl LocationProvider for IpApiComProvider {
    fn name(&self) -> &'static str {
        "ip-api.com"
    }

    async fn attempt(&self, ip: IpAddr) -> Option<RawLocation> {
        let url = format!("{}/json/{}", self.base_url, ip);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(provider = self.name(), error = %err, "Request failed");
                return None;
            }
        };

        let body: IpApiComResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(provider = self.name(), error = %err, "Unparseable response");
                return None;
            }
        };

        if body.status != "success" {
            tracing::debug!(
                provider = self.name(),
                status = %body.status,
                "Provider reported failure"
            );
            return None;
        }

        match (body.city, body.region_name) {
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
