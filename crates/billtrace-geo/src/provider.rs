//! The provider trait the fallback chain iterates over.

use std::net::IpAddr;

use async_trait::async_trait;

/// A location as returned by a provider, before region normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLocation {
    /// City name as reported by the provider.
    pub city: String,

    /// State or region as reported by the provider. May be a 2-letter US
    /// code; the resolver normalizes it.
    pub region: String,
}

/// One strategy for resolving an IP address to a location.
///
/// `attempt` is infallible by contract: network errors, timeouts, parse
/// failures, and responses missing required fields all collapse to `None`
/// so the chain falls through to the next provider. Implementations log
/// the underlying cause at debug level.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Short provider name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Try to resolve the IP address. `None` means fall through.
    async fn attempt(&self, ip: IpAddr) -> Option<RawLocation>;
}
