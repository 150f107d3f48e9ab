//! Application state.

use std::sync::Arc;

use billtrace_geo::{
    IpApiComProvider, IpApiProvider, LocationCache, LocationProvider, NominatimClient,
    OfflineProvider, Resolver,
};
use billtrace_store::Store;

use crate::config::ServiceConfig;
use crate::locks::SerialLocks;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// The location resolver with its provider chain and cache.
    pub resolver: Arc<Resolver>,

    /// Per-serial write locks for the track workflow.
    pub serial_locks: SerialLocks,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create application state, assembling the location resolver from
    /// the configured providers.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        let timeout = config.provider_timeout();

        let mut providers: Vec<Box<dyn LocationProvider>> = vec![
            Box::new(IpApiProvider::new(config.ipapi_base_url.clone(), timeout)),
            Box::new(IpApiComProvider::new(config.ipapi_com_base_url.clone(), timeout)),
        ];

        if let Some(path) = &config.geoip_table_path {
            match OfflineProvider::load(path) {
                Ok(provider) => providers.push(Box::new(provider)),
                Err(err) => {
                    tracing::error!(path = %path, error = %err, "Failed to load offline IP table");
                }
            }
        }

        let resolver = Resolver::new(
            providers,
            NominatimClient::new(config.nominatim_base_url.clone(), timeout),
            LocationCache::new(config.location_cache_ttl()),
        );

        Self {
            store,
            resolver: Arc::new(resolver),
            serial_locks: SerialLocks::new(),
            config,
        }
    }
}
