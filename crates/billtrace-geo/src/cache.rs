//! Per-address result cache with TTL eviction.
//!
//! Reduces provider calls and respects third-party rate limits. An
//! explicit component injected into the resolver rather than ambient
//! state; entries past the TTL are dropped on read and swept on insert,
//! never served stale.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use billtrace_core::Location;

struct CacheEntry {
    location: Location,
    inserted_at: Instant,
}

/// Bounded-lifetime cache of resolved locations keyed by client address.
pub struct LocationCache {
    ttl: Duration,
    entries: Mutex<HashMap<IpAddr, CacheEntry>>,
}

impl LocationCache {
    /// Create a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a fresh entry for the address. Expired entries are removed
    /// and reported as a miss.
    ///
    /// # Panics
    ///
    /// Panics if the cache lock is poisoned.
    #[must_use]
    pub fn get(&self, ip: &IpAddr) -> Option<Location> {
        let mut entries = self.entries.lock().expect("location cache lock poisoned");

        match entries.get(ip) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                Some(entry.location.clone())
            }
            Some(_) => {
                entries.remove(ip);
                None
            }
            None => None,
        }
    }

    /// Store a resolved location for the address, sweeping any entries
    /// that have expired in the meantime.
    ///
    /// # Panics
    ///
    /// Panics if the cache lock is poisoned.
    pub fn insert(&self, ip: IpAddr, location: Location) {
        let mut entries = self.entries.lock().expect("location cache lock poisoned");

        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        entries.insert(
            ip,
            CacheEntry {
                location,
                inserted_at: Instant::now(),
            },
        );
    }
}
