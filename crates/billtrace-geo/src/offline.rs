//! Offline IP-prefix lookup provider.
//!
//! An optional, network-free fallback between the IP geolocation services
//! and the coordinate path. The table is a JSON file of textual address
//! prefixes, loaded once at startup:
//!
//! ```json
//! {
//!   "prefixes": [
//!     { "prefix": "203.0.113.", "city": "Austin", "region": "TX" }
//!   ]
//! }
//! ```
//!
//! Longest matching prefix wins so a more specific entry can override a
//! broader one.

use std::net::IpAddr;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::provider::{LocationProvider, RawLocation};

/// Error loading the offline prefix table.
#[derive(Debug, thiserror::Error)]
pub enum OfflineTableError {
    /// The table file could not be read.
    #[error("failed to read prefix table: {0}")]
    Io(#[from] std::io::Error),

    /// The table file could not be parsed.
    #[error("failed to parse prefix table: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct PrefixEntry {
    prefix: String,
    city: String,
    region: String,
}

#[derive(Debug, Deserialize)]
struct PrefixTable {
    prefixes: Vec<PrefixEntry>,
}

/// Offline IP-to-city provider backed by a prefix table file.
pub struct OfflineProvider {
    entries: Vec<PrefixEntry>,
}

impl OfflineProvider {
    /// Load the prefix table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OfflineTableError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let table: PrefixTable = serde_json::from_str(&contents)?;

        tracing::info!(
            path = %path.as_ref().display(),
            entries = table.prefixes.len(),
            "Loaded offline IP prefix table"
        );

        Ok(Self {
            entries: table.prefixes,
        })
    }
}

#[async_trait]
impl LocationProvider for OfflineProvider {
    fn name(&self) -> &'static str {
        "offline-table"
    }

    async fn attempt(&self, ip: IpAddr) -> Option<RawLocation> {
        let needle = ip.to_string();

        self.entries
            .iter()
            .filter(|entry| needle.starts_with(&entry.prefix))
            .max_by_key(|entry| entry.prefix.len())
            .map(|entry| RawLocation {
                city: entry.city.clone(),
                region: entry.region.clone(),
            })
    }
}
