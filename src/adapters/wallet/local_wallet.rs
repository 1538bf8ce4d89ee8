use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use zeroize::{Zeroize, Zeroizing};

use crate::adapters::recovery::secp256k1_recovery::Secp256k1Recovery;
use crate::core::errors::{FilosignError, Result};
use crate::core::models::public_key::{PUBLIC_KEY_LEN, PublicKey};
use crate::core::models::secret_keys::HolderKey;
use crate::core::models::wallet_address::WalletAddress;
use crate::core::traits::recovery::SignatureRecovery;

/// A secp256k1 wallet kept in a local key file.
///
/// Plays the part of the browser wallet: it signs discovery messages with
/// the personal-message convention and holds the private key needed to
/// open documents.
///
/// File format:
/// ```text
/// # created: 2026-10-18T09:30:00Z
/// # address: 0x7e5f4552091a69125d5dfcb7b8c2659029395bdf
/// # public key: 0x04…
/// 0x<64 hex characters>
/// ```
pub struct LocalWallet {
    signing_key: SigningKey,
}

impl LocalWallet {
    /// Generate a fresh random wallet.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Default wallet location for the current platform.
    ///
    /// - Linux: `~/.config/filosign/wallet.key`
    /// - macOS: `~/Library/Application Support/filosign/wallet.key`
    /// - Windows: `%APPDATA%/filosign/wallet.key`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| FilosignError::InvalidConfig {
            detail: "Could not determine config directory".into(),
        })?;
        Ok(config_dir.join("filosign").join("wallet.key"))
    }

    /// Parse a wallet from a secret scalar in hex, with or without `0x`.
    pub fn from_hex(secret: &str) -> Result<Self> {
        let trimmed = secret.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(hex::decode(digits).map_err(|_| {
            FilosignError::InvalidConfig {
                detail: "Wallet secret is not valid hex".into(),
            }
        })?);
        let signing_key =
            SigningKey::from_slice(&bytes).map_err(|_| FilosignError::InvalidConfig {
                detail: "Wallet secret is not a valid secp256k1 scalar".into(),
            })?;
        Ok(Self { signing_key })
    }

    /// Load the wallet stored at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FilosignError::WalletNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = Zeroizing::new(std::fs::read_to_string(path)?);

        let secret = content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
            .ok_or_else(|| FilosignError::InvalidConfig {
                detail: format!("No wallet secret found in {}", path.display()),
            })?;

        Self::from_hex(secret).map_err(|e| FilosignError::InvalidConfig {
            detail: format!("Invalid wallet file {}: {e}", path.display()),
        })
    }

    /// Write the wallet to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let secret = Zeroizing::new(hex::encode(self.signing_key.to_bytes()));
        let contents = Zeroizing::new(format!(
            "# created: {created}\n# address: {}\n# public key: {}\n0x{}\n",
            self.address(),
            self.public_key(),
            secret.as_str()
        ));
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    pub fn public_key(&self) -> PublicKey {
        let point = k256::PublicKey::from(self.signing_key.verifying_key()).to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(point.as_bytes());
        PublicKey::from_array(bytes)
    }

    pub fn address(&self) -> WalletAddress {
        Secp256k1Recovery.address_of(&self.public_key())
    }

    pub fn holder_key(&self) -> HolderKey {
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        let holder = HolderKey::new(bytes);
        bytes.zeroize();
        holder
    }

    /// Sign `message` the way `personal_sign` does: `r || s || v`, `v` in 27/28.
    pub fn sign_message(&self, message: &str) -> Result<Vec<u8>> {
        let hash = Secp256k1Recovery.hash_message(message);
        let (signature, recid) = self
            .signing_key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| FilosignError::SignerFailed {
                reason: e.to_string(),
            })?;

        let mut out = signature.to_bytes().to_vec();
        out.push(recid.to_byte() + 27);
        Ok(out)
    }
}
