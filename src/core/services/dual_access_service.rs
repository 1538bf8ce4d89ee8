use crate::core::errors::Result;
use crate::core::models::encrypted_document::{ENCRYPTION_METHOD, EncryptedDocument, KeySlot};
use crate::core::models::public_key::PublicKey;
use crate::core::models::secret_keys::{ContentKey, HolderKey};
use crate::core::traits::cipher::CipherBackend;

/// Seals documents so that exactly two public keys can open them.
///
/// A fresh content key encrypts the body; that key is then wrapped once
/// per party. Nothing in the result names either party.
pub struct DualAccessEncryption<C: CipherBackend> {
    pub cipher: C,
}

impl<C: CipherBackend> DualAccessEncryption<C> {
    /// Encrypt `plaintext` for `party_a` and `party_b`.
    pub fn encrypt_document(
        &self,
        plaintext: &[u8],
        party_a: &PublicKey,
        party_b: &PublicKey,
    ) -> Result<EncryptedDocument> {
        let content_key = ContentKey::generate();

        let encrypted_data = self.cipher.seal(&content_key, plaintext)?;
        let wrapped_a = self.cipher.wrap_key(&content_key, party_a)?;
        let wrapped_b = self.cipher.wrap_key(&content_key, party_b)?;

        tracing::info!(
            backend = self.cipher.name(),
            bytes = plaintext.len(),
            "document sealed for two parties"
        );

        Ok(EncryptedDocument {
            encrypted_data: hex::encode(encrypted_data),
            encrypted_key_for_party_a: hex::encode(wrapped_a),
            encrypted_key_for_party_b: hex::encode(wrapped_b),
            encryption_method: ENCRYPTION_METHOD.to_string(),
        })
    }

    /// Try to open `doc` with `holder`.
    ///
    /// `None` covers every failure alike: unknown scheme, a holder that
    /// matches neither slot, or corrupted data.
    pub fn decrypt_document(&self, doc: &EncryptedDocument, holder: &HolderKey) -> Option<Vec<u8>> {
        if !doc.is_known_method() {
            tracing::debug!(method = %doc.encryption_method, "unknown encryption method");
            return None;
        }

        let content_key = KeySlot::ORDER.iter().find_map(|slot| {
            let wrapped = hex::decode(slot.wrapped_key(doc)).ok()?;
            self.cipher.unwrap_key(&wrapped, holder)
        })?;

        let ciphertext = hex::decode(&doc.encrypted_data).ok()?;
        self.cipher.open(&content_key, &ciphertext)
    }
}
