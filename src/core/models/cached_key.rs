use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a discovered key stays usable.
pub const CACHE_TTL_DAYS: i64 = 30;

/// Upper bound accepted for a configured TTL (100 years).
pub const MAX_CACHE_TTL_DAYS: i64 = 36_500;

/// One discovered public key, as persisted in the key cache.
///
/// JSON shape: `{ "publicKey": "0x04…", "timestamp": <ms>, "verified": true }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedKeyEntry {
    pub public_key: String,
    /// Discovery time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub verified: bool,
}

impl CachedKeyEntry {
    /// A verified entry stamped with the current time.
    pub fn verified_now(public_key: String) -> Self {
        Self {
            public_key,
            timestamp: Utc::now().timestamp_millis(),
            verified: true,
        }
    }

    pub fn discovered_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// True while the entry is verified and younger than `ttl`.
    pub fn is_usable(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        if !self.verified {
            return false;
        }
        match self.discovered_at() {
            Some(at) => now - at < ttl,
            None => false,
        }
    }
}

/// The whole persisted mapping: lowercased address → entry.
pub type CacheMap = BTreeMap<String, CachedKeyEntry>;
