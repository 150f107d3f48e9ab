//! The ordered fallback chain.

use std::net::IpAddr;

use billtrace_core::Location;

use crate::cache::LocationCache;
use crate::nominatim::NominatimClient;
use crate::provider::LocationProvider;
use crate::states::normalize_region;

/// Browser-reported coordinates, when the client is an interactive
/// browser context with geolocation permission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub lat: f64,

    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// Resolves client addresses to locations through the provider chain.
///
/// Providers are consulted sequentially in priority order; a success
/// short-circuits the rest. Resolution never fails — the chain ends in
/// [`Location::fallback`].
pub struct Resolver {
    providers: Vec<Box<dyn LocationProvider>>,
    reverse: NominatimClient,
    cache: LocationCache,
}

impl Resolver {
    /// Assemble a resolver from IP providers (in priority order), a
    /// reverse geocoder for client coordinates, and a result cache.
    #[must_use]
    pub fn new(
        providers: Vec<Box<dyn LocationProvider>>,
        reverse: NominatimClient,
        cache: LocationCache,
    ) -> Self {
        Self {
            providers,
            reverse,
            cache,
        }
    }

    /// Resolve a location for the client, always producing one.
    ///
    /// IP-based providers are skipped for private/loopback addresses (no
    /// externally meaningful location exists) and their results are cached
    /// per address. Coordinate lookups bypass the cache: they reflect
    /// device position, not the address.
    pub async fn resolve(&self, client_ip: IpAddr, coordinates: Option<Coordinates>) -> Location {
        if has_public_location(client_ip) {
            if let Some(cached) = self.cache.get(&client_ip) {
                tracing::debug!(ip = %client_ip, "Location cache hit");
                return cached;
            }

            for provider in &self.providers {
                tracing::debug!(
                    provider = provider.name(),
                    ip = %client_ip,
                    "Attempting location provider"
                );

                if let Some(raw) = provider.attempt(client_ip).await {
                    let location = Location {
                        city: raw.city,
                        state: normalize_region(&raw.region),
                        approximate: true,
                    };
                    tracing::debug!(
                        provider = provider.name(),
                        city = %location.city,
                        state = %location.state,
                        "Provider succeeded"
                    );
                    self.cache.insert(client_ip, location.clone());
                    return location;
                }

                tracing::debug!(provider = provider.name(), "Provider failed, falling through");
            }
        } else {
            tracing::debug!(
                ip = %client_ip,
                "Private or loopback address, skipping IP providers"
            );
        }

        if let Some(coordinates) = coordinates {
            tracing::debug!(
                lat = coordinates.lat,
                lon = coordinates.lon,
                "Attempting reverse geocoding of client coordinates"
            );

            if let Some(raw) = self.reverse.attempt(coordinates).await {
                tracing::debug!(city = %raw.city, "Reverse geocoding succeeded");
                return Location {
                    city: raw.city,
                    state: normalize_region(&raw.region),
                    approximate: false,
                };
            }

            tracing::debug!("Reverse geocoding failed");
        }

        tracing::debug!("All location providers failed, using fixed default");
        Location::fallback()
    }
}

/// Whether an address can meaningfully be looked up by IP geolocation.
fn has_public_location(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified())
        }
        IpAddr::V6(v6) => {
            let unique_local = (v6.segments()[0] & 0xfe00) == 0xfc00;
            let link_local = (v6.segments()[0] & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
        }
    }
}
