use chrono::Utc;

use crate::core::errors::{FilosignError, Result};
use crate::core::models::public_key::PublicKey;
use crate::core::models::wallet_address::WalletAddress;
use crate::core::services::key_cache::KeyDiscoveryCache;
use crate::core::traits::key_value_store::KeyValueStore;
use crate::core::traits::recovery::SignatureRecovery;

/// Literal tag at the start of every discovery message.
pub const DISCOVERY_TAG: &str = "FiloSign Public Key Discovery";

/// Build the message a wallet signs to publish its public key.
///
/// Binding the address and a millisecond timestamp makes every message
/// unique per address and per attempt, so a signature cannot be replayed
/// for another address or reused later.
pub fn discovery_message(address: &WalletAddress, timestamp_ms: i64) -> String {
    format!("{DISCOVERY_TAG}\n\naddress: {address}\ntimestamp: {timestamp_ms}")
}

/// Discovers wallet public keys from signatures and caches them.
pub struct PublicKeyService<S: KeyValueStore, R: SignatureRecovery> {
    pub cache: KeyDiscoveryCache<S>,
    pub recovery: R,
}

impl<S: KeyValueStore, R: SignatureRecovery> PublicKeyService<S, R> {
    /// Cached key for `address`, if any. Never asks for a signature.
    pub fn get_public_key(&self, address: &str) -> Result<Option<PublicKey>> {
        let address = WalletAddress::parse(address)?;
        Ok(self.cache.get(&address))
    }

    /// Return the public key of `address`, asking `signer` to prove it if
    /// the key is not cached yet.
    ///
    /// `signer` is invoked at most once and is never stored. The recovered
    /// key is returned even when caching it fails; the failure is logged.
    pub fn discover_public_key<F, E>(&self, address: &str, signer: F) -> Result<PublicKey>
    where
        F: FnOnce(&str) -> std::result::Result<Vec<u8>, E>,
        E: std::fmt::Display,
    {
        let address = WalletAddress::parse(address)?;

        if let Some(key) = self.cache.get(&address) {
            tracing::debug!(address = %address, "public key already cached");
            return Ok(key);
        }

        let message = discovery_message(&address, Utc::now().timestamp_millis());
        tracing::info!(address = %address, "requesting discovery signature");

        let signature = signer(&message).map_err(|e| FilosignError::SignerFailed {
            reason: e.to_string(),
        })?;

        let hash = self.recovery.hash_message(&message);
        let recovery_failed = |e: FilosignError| FilosignError::RecoveryFailed {
            reason: e.to_string(),
        };
        let public_key = self
            .recovery
            .recover_public_key(&hash, &signature)
            .map_err(recovery_failed)?;
        let recovered = self
            .recovery
            .recover_address(&hash, &signature)
            .map_err(recovery_failed)?;

        if recovered != address {
            tracing::warn!(
                expected = %address,
                recovered = %recovered,
                "discovery signature from a different address"
            );
            return Err(FilosignError::SignatureMismatch {
                expected: address.to_string(),
                recovered: recovered.to_string(),
            });
        }

        if let Err(e) = self.cache.put(&address, &public_key) {
            tracing::warn!(address = %address, error = %e, "discovered key could not be cached");
        }

        tracing::info!(address = %address, "public key discovered");
        Ok(public_key)
    }

    /// Store a key for `address` directly, bypassing discovery.
    pub fn cache_public_key(&self, address: &str, public_key: &str) -> Result<()> {
        let address = WalletAddress::parse(address)?;
        let public_key = PublicKey::parse(public_key)?;
        self.cache.put(&address, &public_key)
    }

    pub fn remove_cached_key(&self, address: &str) -> Result<()> {
        let address = WalletAddress::parse(address)?;
        self.cache.remove(&address)
    }

    pub fn clear_all_cached_keys(&self) -> Result<()> {
        self.cache.clear()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::adapters::key_stores::memory_store::MemoryStore;
    use crate::adapters::recovery::secp256k1_recovery::Secp256k1Recovery;
    use crate::adapters::wallet::local_wallet::LocalWallet;
    use crate::core::services::key_cache::DEFAULT_STORAGE_KEY;

    fn service() -> PublicKeyService<MemoryStore, Secp256k1Recovery> {
        PublicKeyService {
            cache: KeyDiscoveryCache::new(MemoryStore::new()),
            recovery: Secp256k1Recovery::new(),
        }
    }

    fn stored_json(svc: &PublicKeyService<MemoryStore, Secp256k1Recovery>) -> Option<String> {
        svc.cache.store().raw(DEFAULT_STORAGE_KEY)
    }

    #[test]
    fn discovery_message_binds_tag_address_and_time() {
        let addr = WalletAddress::parse(&format!("0x{}", "ab".repeat(20))).unwrap();
        let msg = discovery_message(&addr, 1_760_000_000_000);
        assert!(msg.starts_with(DISCOVERY_TAG));
        assert!(msg.contains(addr.as_str()));
        assert!(msg.contains("1760000000000"));
        assert!(msg.contains("address"));
        assert!(msg.contains("timestamp"));
        assert_ne!(msg, discovery_message(&addr, 1_760_000_000_001));
    }

    #[test]
    fn discovery_message_differs_per_address() {
        let first = WalletAddress::parse(&format!("0x{}", "ab".repeat(20))).unwrap();
        let second = WalletAddress::parse(&format!("0x{}", "cd".repeat(20))).unwrap();
        assert_ne!(
            discovery_message(&first, 1_760_000_000_000),
            discovery_message(&second, 1_760_000_000_000)
        );
    }

    #[test]
    fn discover_recovers_and_caches_key() {
        let svc = service();
        let wallet = LocalWallet::generate();
        let address = wallet.address().to_string();

        let key = svc
            .discover_public_key(&address, |msg| wallet.sign_message(msg))
            .unwrap();

        assert_eq!(key, wallet.public_key());
        assert_eq!(svc.get_public_key(&address).unwrap(), Some(key));
    }

    #[test]
    fn discover_accepts_checksummed_address() {
        let svc = service();
        let wallet = LocalWallet::generate();
        let upper = wallet.address().as_str().to_uppercase().replacen("0X", "0x", 1);

        let key = svc
            .discover_public_key(&upper, |msg| wallet.sign_message(msg))
            .unwrap();
        assert_eq!(key, wallet.public_key());
    }

    #[test]
    fn second_discovery_does_not_call_signer() {
        let svc = service();
        let wallet = LocalWallet::generate();
        let address = wallet.address().to_string();
        let calls = Cell::new(0);

        let sign = |msg: &str| {
            calls.set(calls.get() + 1);
            wallet.sign_message(msg)
        };
        let first = svc.discover_public_key(&address, sign).unwrap();

        let second = svc
            .discover_public_key(&address, |_: &str| -> std::result::Result<Vec<u8>, String> {
                panic!("signer must not be called for a cached key")
            })
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn signed_message_names_the_address() {
        let svc = service();
        let wallet = LocalWallet::generate();
        let seen = RefCell::new(String::new());

        svc.discover_public_key(wallet.address().as_str(), |msg| {
            *seen.borrow_mut() = msg.to_string();
            wallet.sign_message(msg)
        })
        .unwrap();

        let msg = seen.into_inner();
        assert!(msg.starts_with(DISCOVERY_TAG));
        assert!(msg.contains(wallet.address().as_str()));
    }

    #[test]
    fn signature_from_other_wallet_is_rejected_and_not_cached() {
        let svc = service();
        let claimed = LocalWallet::generate();
        let impostor = LocalWallet::generate();

        let result = svc.discover_public_key(claimed.address().as_str(), |msg| {
            impostor.sign_message(msg)
        });

        let err = result.unwrap_err();
        assert!(matches!(err, FilosignError::SignatureMismatch { .. }));
        assert!(err.to_string().contains("signature validation failed"));
        assert!(stored_json(&svc).is_none());
    }

    #[test]
    fn signer_failure_is_wrapped_with_cause() {
        let svc = service();
        let wallet = LocalWallet::generate();

        let err = svc
            .discover_public_key(wallet.address().as_str(), |_| {
                Err::<Vec<u8>, _>("User rejected the request")
            })
            .unwrap_err();

        assert!(matches!(err, FilosignError::SignerFailed { .. }));
        assert!(
            err.to_string()
                .starts_with("Public key discovery failed: User rejected the request")
        );
        assert!(stored_json(&svc).is_none());
    }

    #[test]
    fn malformed_address_fails_before_signing() {
        let svc = service();
        let called = Cell::new(false);

        let err = svc
            .discover_public_key("0x1234", |_| {
                called.set(true);
                Ok::<_, String>(vec![0u8; 65])
            })
            .unwrap_err();

        assert!(matches!(err, FilosignError::InvalidAddress { .. }));
        assert!(!called.get());
    }

    #[test]
    fn garbage_signature_is_rejected() {
        let svc = service();
        let wallet = LocalWallet::generate();

        let err = svc
            .discover_public_key(wallet.address().as_str(), |_| Ok::<_, String>(vec![1u8; 12]))
            .unwrap_err();
        assert!(matches!(err, FilosignError::RecoveryFailed { .. }));
    }

    #[test]
    fn unrecoverable_signature_reports_discovery_failure() {
        let svc = service();
        let wallet = LocalWallet::generate();

        let err = svc
            .discover_public_key(wallet.address().as_str(), |_| Ok::<_, String>(vec![0u8; 65]))
            .unwrap_err();

        assert!(matches!(err, FilosignError::RecoveryFailed { .. }));
        assert!(err.to_string().contains("Public key discovery failed"));
        assert!(stored_json(&svc).is_none());
    }

    #[test]
    fn cache_write_failure_still_returns_key() {
        let svc = service();
        let wallet = LocalWallet::generate();
        svc.cache.store().fail_writes(true);

        let key = svc
            .discover_public_key(wallet.address().as_str(), |msg| wallet.sign_message(msg))
            .unwrap();

        assert_eq!(key, wallet.public_key());
        assert!(stored_json(&svc).is_none());
    }

    #[test]
    fn read_failure_falls_back_to_signing() {
        let svc = service();
        let wallet = LocalWallet::generate();
        let address = wallet.address().to_string();
        svc.discover_public_key(&address, |msg| wallet.sign_message(msg))
            .unwrap();

        svc.cache.store().fail_reads(true);
        let calls = Cell::new(0);
        let key = svc
            .discover_public_key(&address, |msg| {
                calls.set(calls.get() + 1);
                wallet.sign_message(msg)
            })
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(key, wallet.public_key());
    }

    #[test]
    fn cache_management_pass_throughs() {
        let svc = service();
        let a = LocalWallet::generate();
        let b = LocalWallet::generate();

        svc.cache_public_key(a.address().as_str(), &a.public_key().to_hex())
            .unwrap();
        svc.cache_public_key(b.address().as_str(), &b.public_key().to_hex())
            .unwrap();
        assert_eq!(
            svc.get_public_key(a.address().as_str()).unwrap(),
            Some(a.public_key())
        );

        svc.remove_cached_key(a.address().as_str()).unwrap();
        assert_eq!(svc.get_public_key(a.address().as_str()).unwrap(), None);
        assert!(svc.get_public_key(b.address().as_str()).unwrap().is_some());

        svc.clear_all_cached_keys().unwrap();
        assert_eq!(svc.get_public_key(b.address().as_str()).unwrap(), None);
    }

    #[test]
    fn cache_public_key_rejects_malformed_key() {
        let svc = service();
        let wallet = LocalWallet::generate();
        let err = svc
            .cache_public_key(wallet.address().as_str(), "0x02abcdef")
            .unwrap_err();
        assert!(matches!(err, FilosignError::InvalidPublicKey { .. }));
    }

    #[test]
    fn cache_write_failures_propagate_from_management_calls() {
        let svc = service();
        let wallet = LocalWallet::generate();
        svc.cache.store().fail_writes(true);

        assert!(
            svc.cache_public_key(wallet.address().as_str(), &wallet.public_key().to_hex())
                .is_err()
        );
        assert!(svc.clear_all_cached_keys().is_err());
    }
}
