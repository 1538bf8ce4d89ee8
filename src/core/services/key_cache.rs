use chrono::{Duration, Utc};

use crate::core::errors::{FilosignError, Result};
use crate::core::models::cached_key::{CacheMap, CachedKeyEntry, MAX_CACHE_TTL_DAYS};
use crate::core::models::public_key::PublicKey;
use crate::core::models::wallet_address::WalletAddress;
use crate::core::traits::key_value_store::KeyValueStore;

/// Storage key the whole cache mapping lives under by default.
pub const DEFAULT_STORAGE_KEY: &str = "filosign_public_keys";

/// Cache of discovered public keys, keyed by lowercased address.
///
/// Entries expire lazily: an expired or unverified entry is dropped the
/// next time it is read, never by a background sweep.
///
/// Reads degrade to "absent" when the store fails, since discovery can
/// always re-derive a key. Writes propagate store failures.
pub struct KeyDiscoveryCache<S: KeyValueStore> {
    store: S,
    storage_key: String,
    ttl: Duration,
}

impl<S: KeyValueStore> KeyDiscoveryCache<S> {
    /// Cache with the default storage key and 30-day TTL.
    #[cfg(test)]
    pub fn new(store: S) -> Self {
        Self::with_settings(
            store,
            DEFAULT_STORAGE_KEY,
            crate::core::models::cached_key::CACHE_TTL_DAYS,
        )
    }

    pub fn with_settings(store: S, storage_key: &str, ttl_days: i64) -> Self {
        Self {
            store,
            storage_key: storage_key.to_string(),
            ttl: Duration::days(ttl_days.clamp(0, MAX_CACHE_TTL_DAYS)),
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up a usable key for `address`.
    ///
    /// Purges the entry when it is expired, unverified, or holds a
    /// malformed key.
    pub fn get(&self, address: &WalletAddress) -> Option<PublicKey> {
        let mut map = match self.load() {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(error = %e, "key cache unreadable, treating as empty");
                return None;
            }
        };

        let entry = map.get(address.as_str())?;
        let now = Utc::now();
        let usable = entry.is_usable(now, self.ttl);
        let parsed = PublicKey::parse(&entry.public_key).ok();

        match (usable, parsed) {
            (true, Some(key)) => {
                tracing::debug!(address = %address, "key cache hit");
                Some(key)
            }
            _ => {
                tracing::debug!(address = %address, "purging stale key cache entry");
                map.remove(address.as_str());
                if let Err(e) = self.save(&map) {
                    tracing::warn!(error = %e, "could not purge stale key cache entry");
                }
                None
            }
        }
    }

    /// Insert or overwrite a verified entry for `address`.
    pub fn put(&self, address: &WalletAddress, public_key: &PublicKey) -> Result<()> {
        let mut map = self.load()?;
        map.insert(
            address.as_str().to_string(),
            CachedKeyEntry::verified_now(public_key.to_hex()),
        );
        self.save(&map)
    }

    /// Delete the entry for `address`. No-op when absent.
    pub fn remove(&self, address: &WalletAddress) -> Result<()> {
        let mut map = self.load()?;
        if map.remove(address.as_str()).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }

    /// Delete every entry.
    pub fn clear(&self) -> Result<()> {
        self.store.delete(&self.storage_key)
    }

    /// All currently usable entries. Invalid ones met along the way are purged.
    pub fn entries(&self) -> Result<Vec<(WalletAddress, CachedKeyEntry)>> {
        let mut map = self.load()?;
        let now = Utc::now();
        let before = map.len();

        map.retain(|addr, entry| {
            entry.is_usable(now, self.ttl)
                && WalletAddress::is_well_formed(addr)
                && PublicKey::is_well_formed(&entry.public_key)
        });

        if map.len() != before {
            self.save(&map)?;
        }

        map.into_iter()
            .map(|(addr, entry)| WalletAddress::parse(&addr).map(|a| (a, entry)))
            .collect()
    }

    fn load(&self) -> Result<CacheMap> {
        let raw = self.store.read(&self.storage_key)?;
        match raw {
            None => Ok(CacheMap::new()),
            Some(json) => serde_json::from_str(&json).map_err(|e| FilosignError::StorageFailed {
                operation: "read",
                reason: format!("corrupt cache data: {e}"),
            }),
        }
    }

    fn save(&self, map: &CacheMap) -> Result<()> {
        let json = serde_json::to_string(map).map_err(|e| FilosignError::StorageFailed {
            operation: "write",
            reason: e.to_string(),
        })?;
        self.store.write(&self.storage_key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::key_stores::memory_store::MemoryStore;

    fn addr(byte: char) -> WalletAddress {
        WalletAddress::parse(&format!("0x{}", byte.to_string().repeat(40))).unwrap()
    }

    fn key(byte: &str) -> PublicKey {
        PublicKey::parse(&format!("0x04{}", byte.repeat(64))).unwrap()
    }

    fn raw_map(cache: &KeyDiscoveryCache<MemoryStore>) -> CacheMap {
        cache
            .store()
            .raw(DEFAULT_STORAGE_KEY)
            .map(|json| serde_json::from_str(&json).unwrap())
            .unwrap_or_default()
    }

    fn seed(cache: &KeyDiscoveryCache<MemoryStore>, address: &str, entry: CachedKeyEntry) {
        let mut map = raw_map(cache);
        map.insert(address.to_string(), entry);
        cache
            .store()
            .set_raw(DEFAULT_STORAGE_KEY, &serde_json::to_string(&map).unwrap());
    }

    #[test]
    fn oversized_ttl_does_not_panic() {
        let cache = KeyDiscoveryCache::with_settings(MemoryStore::new(), DEFAULT_STORAGE_KEY, i64::MAX);
        cache.put(&addr('a'), &key("ab")).unwrap();
        assert_eq!(cache.get(&addr('a')), Some(key("ab")));
    }

    #[test]
    fn get_on_empty_store_is_absent() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        assert!(cache.get(&addr('a')).is_none());
    }

    #[test]
    fn put_then_get_returns_key() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.put(&addr('a'), &key("ab")).unwrap();
        assert_eq!(cache.get(&addr('a')), Some(key("ab")));
    }

    #[test]
    fn lookup_ignores_address_case() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        let upper = WalletAddress::parse(&format!("0x{}", "A".repeat(40))).unwrap();
        cache.put(&upper, &key("ab")).unwrap();

        assert_eq!(cache.get(&addr('a')), Some(key("ab")));
        assert!(raw_map(&cache).contains_key(&format!("0x{}", "a".repeat(40))));
    }

    #[test]
    fn put_marks_entry_verified_and_timestamped() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        let before = Utc::now().timestamp_millis();
        cache.put(&addr('a'), &key("ab")).unwrap();

        let entry = raw_map(&cache).remove(addr('a').as_str()).unwrap();
        assert!(entry.verified);
        assert!(entry.timestamp >= before);
        assert_eq!(entry.public_key, key("ab").to_hex());
    }

    #[test]
    fn put_overwrites_and_keeps_other_addresses() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.put(&addr('a'), &key("01")).unwrap();
        cache.put(&addr('b'), &key("02")).unwrap();
        cache.put(&addr('a'), &key("03")).unwrap();

        assert_eq!(cache.get(&addr('a')), Some(key("03")));
        assert_eq!(cache.get(&addr('b')), Some(key("02")));
    }

    #[test]
    fn expired_entry_is_absent_and_purged() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        seed(
            &cache,
            addr('a').as_str(),
            CachedKeyEntry {
                public_key: key("ab").to_hex(),
                timestamp: (Utc::now() - Duration::days(31)).timestamp_millis(),
                verified: true,
            },
        );

        assert!(cache.get(&addr('a')).is_none());
        assert!(!raw_map(&cache).contains_key(addr('a').as_str()));
    }

    #[test]
    fn unverified_entry_is_absent_and_purged() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        seed(
            &cache,
            addr('a').as_str(),
            CachedKeyEntry {
                public_key: key("ab").to_hex(),
                timestamp: Utc::now().timestamp_millis(),
                verified: false,
            },
        );

        assert!(cache.get(&addr('a')).is_none());
        assert!(raw_map(&cache).is_empty());
    }

    #[test]
    fn malformed_stored_key_is_purged() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        seed(
            &cache,
            addr('a').as_str(),
            CachedKeyEntry::verified_now("not-a-key".into()),
        );

        assert!(cache.get(&addr('a')).is_none());
        assert!(raw_map(&cache).is_empty());
    }

    #[test]
    fn purge_leaves_other_entries() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.put(&addr('b'), &key("02")).unwrap();
        seed(
            &cache,
            addr('a').as_str(),
            CachedKeyEntry {
                public_key: key("01").to_hex(),
                timestamp: 0,
                verified: true,
            },
        );

        assert!(cache.get(&addr('a')).is_none());
        assert_eq!(cache.get(&addr('b')), Some(key("02")));
    }

    #[test]
    fn remove_deletes_only_named_entry() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.put(&addr('a'), &key("01")).unwrap();
        cache.put(&addr('b'), &key("02")).unwrap();

        cache.remove(&addr('a')).unwrap();

        assert!(cache.get(&addr('a')).is_none());
        assert_eq!(cache.get(&addr('b')), Some(key("02")));
    }

    #[test]
    fn remove_missing_is_noop() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.remove(&addr('c')).unwrap();
    }

    #[test]
    fn clear_deletes_everything() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.put(&addr('a'), &key("01")).unwrap();
        cache.put(&addr('b'), &key("02")).unwrap();

        cache.clear().unwrap();

        assert!(cache.store().raw(DEFAULT_STORAGE_KEY).is_none());
        assert!(cache.get(&addr('a')).is_none());
    }

    #[test]
    fn read_failure_degrades_to_absent() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.put(&addr('a'), &key("01")).unwrap();
        cache.store().fail_reads(true);

        assert!(cache.get(&addr('a')).is_none());
    }

    #[test]
    fn corrupt_json_degrades_to_absent() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.store().set_raw(DEFAULT_STORAGE_KEY, "{not json");
        assert!(cache.get(&addr('a')).is_none());
    }

    #[test]
    fn write_failures_propagate() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.put(&addr('a'), &key("01")).unwrap();
        cache.store().fail_writes(true);

        assert!(matches!(
            cache.put(&addr('b'), &key("02")),
            Err(FilosignError::StorageFailed { .. })
        ));
        assert!(cache.remove(&addr('a')).is_err());
        assert!(cache.clear().is_err());
    }

    #[test]
    fn entries_lists_only_usable_and_purges_rest() {
        let cache = KeyDiscoveryCache::new(MemoryStore::new());
        cache.put(&addr('a'), &key("01")).unwrap();
        seed(
            &cache,
            addr('b').as_str(),
            CachedKeyEntry {
                public_key: key("02").to_hex(),
                timestamp: (Utc::now() - Duration::days(45)).timestamp_millis(),
                verified: true,
            },
        );

        let entries = cache.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, addr('a'));
        assert_eq!(raw_map(&cache).len(), 1);
    }

    #[test]
    fn custom_ttl_applies() {
        let cache = KeyDiscoveryCache::with_settings(MemoryStore::new(), "custom", 1);
        cache.put(&addr('a'), &key("01")).unwrap();
        assert!(cache.get(&addr('a')).is_some());
        assert!(cache.store().raw("custom").is_some());
        assert!(cache.store().raw(DEFAULT_STORAGE_KEY).is_none());
    }
}
