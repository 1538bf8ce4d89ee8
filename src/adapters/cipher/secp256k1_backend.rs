use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce, XChaCha20Poly1305, XNonce};
use hkdf::Hkdf;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey as CurvePoint, SecretKey};
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::core::errors::{FilosignError, Result};
use crate::core::models::public_key::{PUBLIC_KEY_LEN, PublicKey};
use crate::core::models::secret_keys::{CONTENT_KEY_LEN, ContentKey, HolderKey};
use crate::core::traits::cipher::CipherBackend;

pub const CONTENT_NONCE_LEN: usize = 24;
pub const TAG_LEN: usize = 16;

/// Ephemeral point + wrapped content key + tag.
pub const WRAPPED_KEY_LEN: usize = PUBLIC_KEY_LEN + CONTENT_KEY_LEN + TAG_LEN;

/// Fixed nonce for key wrapping (safe because each wrapping key is unique).
const WRAP_NONCE: [u8; 12] = [0u8; 12];

const CONTENT_AAD: &[u8] = b"filosign-dual-access-v1-content";
const EPHEMERAL_INFO: &[u8] = b"filosign-dual-access-v1-ephemeral";
const WRAP_INFO: &[u8] = b"filosign-dual-access-v1-wrap";

/// secp256k1 ECIES key wrapping + XChaCha20-Poly1305 document encryption.
///
/// Document body: `nonce(24) || ciphertext || tag(16)`, random nonce.
///
/// Wrapped key: `ephemeral_point(65) || ChaCha20-Poly1305(content_key)`.
/// The ephemeral scalar is derived with HKDF from the content key and the
/// recipient point, so a (content key, recipient) pair always wraps to the
/// same bytes, two recipients never share an ephemeral, and a fresh content
/// key never reuses one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Backend;

impl Secp256k1Backend {
    pub fn new() -> Self {
        Self
    }

    fn derive_ephemeral(key: &ContentKey, recipient: &PublicKey) -> Result<SecretKey> {
        let hk = Hkdf::<Sha256>::new(Some(&recipient.as_bytes()[..]), key.as_bytes());

        // Out-of-range scalars are astronomically rare; step a counter past them
        for counter in 0u8..=u8::MAX {
            let mut okm = Zeroizing::new([0u8; 32]);
            let info = [EPHEMERAL_INFO, &[counter][..]].concat();
            hk.expand(&info, &mut okm[..])
                .map_err(|e| FilosignError::EncryptionFailed {
                    reason: format!("ephemeral derivation failed: {e}"),
                })?;
            if let Ok(secret) = SecretKey::from_slice(&okm[..]) {
                return Ok(secret);
            }
        }

        Err(FilosignError::EncryptionFailed {
            reason: "could not derive an ephemeral key".into(),
        })
    }

    fn derive_wrap_key(
        shared: &[u8],
        ephemeral: &[u8],
        recipient: &[u8],
    ) -> Option<Zeroizing<[u8; 32]>> {
        let salt = [ephemeral, recipient].concat();
        let hk = Hkdf::<Sha256>::new(Some(salt.as_slice()), shared);
        let mut okm = Zeroizing::new([0u8; 32]);
        hk.expand(WRAP_INFO, &mut okm[..]).ok()?;
        Some(okm)
    }
}

impl CipherBackend for Secp256k1Backend {
    fn seal(&self, key: &ContentKey, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

        let mut nonce = [0u8; CONTENT_NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: CONTENT_AAD,
                },
            )
            .map_err(|e| FilosignError::EncryptionFailed {
                reason: format!("document encryption failed: {e}"),
            })?;

        let mut out = Vec::with_capacity(CONTENT_NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn open(&self, key: &ContentKey, ciphertext: &[u8]) -> Option<Vec<u8>> {
        if ciphertext.len() < CONTENT_NONCE_LEN + TAG_LEN {
            return None;
        }
        let (nonce, body) = ciphertext.split_at(CONTENT_NONCE_LEN);

        let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: body,
                    aad: CONTENT_AAD,
                },
            )
            .ok()
    }

    fn wrap_key(&self, key: &ContentKey, recipient: &PublicKey) -> Result<Vec<u8>> {
        let point = CurvePoint::from_sec1_bytes(recipient.as_bytes()).map_err(|_| {
            FilosignError::EncryptionFailed {
                reason: format!("{recipient} is not a point on secp256k1"),
            }
        })?;

        let ephemeral = Self::derive_ephemeral(key, recipient)?;
        let ephemeral_point = ephemeral.public_key().to_encoded_point(false);

        let shared = k256::ecdh::diffie_hellman(ephemeral.to_nonzero_scalar(), point.as_affine());
        let wrap_key = Self::derive_wrap_key(
            shared.raw_secret_bytes().as_slice(),
            ephemeral_point.as_bytes(),
            recipient.as_bytes(),
        )
        .ok_or_else(|| FilosignError::EncryptionFailed {
            reason: "wrap key derivation failed".into(),
        })?;

        let wrapped = ChaCha20Poly1305::new(Key::from_slice(&wrap_key[..]))
            .encrypt(Nonce::from_slice(&WRAP_NONCE), key.as_bytes().as_slice())
            .map_err(|e| FilosignError::EncryptionFailed {
                reason: format!("key wrapping failed: {e}"),
            })?;

        let mut out = Vec::with_capacity(WRAPPED_KEY_LEN);
        out.extend_from_slice(ephemeral_point.as_bytes());
        out.extend_from_slice(&wrapped);
        Ok(out)
    }

    fn unwrap_key(&self, wrapped: &[u8], holder: &HolderKey) -> Option<ContentKey> {
        if wrapped.len() != WRAPPED_KEY_LEN {
            return None;
        }
        let (ephemeral_bytes, sealed) = wrapped.split_at(PUBLIC_KEY_LEN);

        let secret = SecretKey::from_slice(holder.as_bytes()).ok()?;
        let ephemeral = CurvePoint::from_sec1_bytes(ephemeral_bytes).ok()?;
        let holder_point = secret.public_key().to_encoded_point(false);

        let shared = k256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), ephemeral.as_affine());
        let wrap_key = Self::derive_wrap_key(
            shared.raw_secret_bytes().as_slice(),
            ephemeral_bytes,
            holder_point.as_bytes(),
        )?;

        let plain = ChaCha20Poly1305::new(Key::from_slice(&wrap_key[..]))
            .decrypt(Nonce::from_slice(&WRAP_NONCE), sealed)
            .ok()
            .map(Zeroizing::new)?;
        ContentKey::from_slice(&plain)
    }

    fn name(&self) -> &str {
        "secp256k1-ecies+xchacha20poly1305"
    }
}
