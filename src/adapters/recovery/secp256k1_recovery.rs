use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

use crate::core::errors::{FilosignError, Result};
use crate::core::models::public_key::PublicKey;
use crate::core::models::wallet_address::WalletAddress;
use crate::core::traits::recovery::SignatureRecovery;

/// Length of an `r || s || v` wallet signature.
pub const SIGNATURE_LEN: usize = 65;

/// secp256k1 recovery with Ethereum conventions: EIP-191 personal-message
/// hashing and Keccak-256 address derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Recovery;

impl Secp256k1Recovery {
    pub fn new() -> Self {
        Self
    }

    /// `keccak256(data)`
    pub fn keccak256(data: &[u8]) -> [u8; 32] {
        Keccak256::digest(data).into()
    }

    /// Split a 65-byte signature into its ECDSA part and recovery id.
    ///
    /// Accepts `v` as 0/1 or the legacy 27/28. High-S signatures are
    /// normalized and their recovery id flipped.
    pub fn split_signature(signature: &[u8]) -> Result<(Signature, RecoveryId)> {
        if signature.len() != SIGNATURE_LEN {
            return Err(FilosignError::InvalidSignature {
                reason: format!(
                    "expected {SIGNATURE_LEN} bytes, got {}",
                    signature.len()
                ),
            });
        }

        let sig = Signature::from_slice(&signature[..64]).map_err(|e| {
            FilosignError::InvalidSignature {
                reason: format!("malformed r/s values: {e}"),
            }
        })?;

        let v = match signature[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            other => {
                return Err(FilosignError::InvalidSignature {
                    reason: format!("unsupported recovery byte {other}"),
                });
            }
        };
        let recid = RecoveryId::from_byte(v).ok_or_else(|| FilosignError::InvalidSignature {
            reason: format!("unsupported recovery byte {v}"),
        })?;

        Ok(match sig.normalize_s() {
            Some(normalized) => (
                normalized,
                RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced()),
            ),
            None => (sig, recid),
        })
    }

    fn recover_verifying_key(hash: &[u8; 32], signature: &[u8]) -> Result<VerifyingKey> {
        let (sig, recid) = Self::split_signature(signature)?;
        VerifyingKey::recover_from_prehash(hash, &sig, recid).map_err(|e| {
            FilosignError::InvalidSignature {
                reason: format!("public key recovery failed: {e}"),
            }
        })
    }

    fn encode(key: &VerifyingKey) -> Result<PublicKey> {
        let point = k256::PublicKey::from(key).to_encoded_point(false);
        PublicKey::from_bytes(point.as_bytes())
    }
}

impl SignatureRecovery for Secp256k1Recovery {
    fn hash_message(&self, message: &str) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()).as_bytes());
        hasher.update(message.as_bytes());
        hasher.finalize().into()
    }

    fn recover_public_key(&self, hash: &[u8; 32], signature: &[u8]) -> Result<PublicKey> {
        let key = Self::recover_verifying_key(hash, signature)?;
        Self::encode(&key)
    }

    fn recover_address(&self, hash: &[u8; 32], signature: &[u8]) -> Result<WalletAddress> {
        let key = Self::recover_verifying_key(hash, signature)?;
        Ok(self.address_of(&Self::encode(&key)?))
    }

    fn address_of(&self, public_key: &PublicKey) -> WalletAddress {
        let digest = Self::keccak256(&public_key.as_bytes()[1..]);
        let mut tail = [0u8; 20];
        tail.copy_from_slice(&digest[12..]);
        WalletAddress::from_bytes(&tail)
    }
}
