//! Location resolution for billtrace.
//!
//! Resolves a client IP address (and, when the client supplies them,
//! browser-reported coordinates) to a city and state through an ordered
//! chain of independently fallible providers:
//!
//! 1. ipapi.co IP geolocation
//! 2. ip-api.com IP geolocation
//! 3. an optional offline IP-prefix table (no network call)
//! 4. Nominatim reverse geocoding of client coordinates
//! 5. a fixed default (`New York, New York`)
//!
//! Resolution is total: every provider failure is absorbed and only causes
//! fallthrough, a success short-circuits the rest, and the chain always
//! ends in the fixed default. Private and loopback client addresses skip
//! the IP-based providers entirely.
//!
//! Region normalization (2-letter US state codes to full names) is applied
//! exactly once, centrally, in [`Resolver::resolve`] — providers hand back
//! raw fields.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod ipapi;
pub mod ipapi_com;
pub mod nominatim;
pub mod offline;
pub mod provider;
pub mod resolver;
pub mod states;

pub use cache::LocationCache;
pub use ipapi::IpApiProvider;
pub use ipapi_com::IpApiComProvider;
pub use nominatim::NominatimClient;
pub use offline::OfflineProvider;
pub use provider::{LocationProvider, RawLocation};
pub use resolver::{Coordinates, Resolver};
pub use states::normalize_region;
