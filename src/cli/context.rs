use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::adapters::cipher::secp256k1_backend::Secp256k1Backend;
use crate::adapters::key_stores::file_key_value_store::FileKeyValueStore;
use crate::adapters::recovery::secp256k1_recovery::Secp256k1Recovery;
use crate::adapters::wallet::local_wallet::LocalWallet;
use crate::config::app_config::AppConfig;
use crate::core::errors::{FilosignError, Result};
use crate::core::services::dual_access_service::DualAccessEncryption;
use crate::core::services::key_cache::KeyDiscoveryCache;
use crate::core::services::public_key_service::PublicKeyService;

static PROJECT_DIR: OnceLock<PathBuf> = OnceLock::new();
static WALLET_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the global paths from the command line.
pub fn init(dir: &str, wallet: Option<&str>) {
    let _ = PROJECT_DIR.set(PathBuf::from(dir));
    if let Some(path) = wallet {
        let _ = WALLET_PATH.set(PathBuf::from(path));
    }
}

/// Get the current project directory path.
pub fn project_dir() -> &'static Path {
    PROJECT_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new(".filosign"))
}

/// Wallet file from `--wallet`, or the platform default.
pub fn wallet_path() -> Result<PathBuf> {
    match WALLET_PATH.get() {
        Some(path) => Ok(path.clone()),
        None => LocalWallet::default_path(),
    }
}

pub fn load_wallet() -> Result<LocalWallet> {
    LocalWallet::load(&wallet_path()?)
}

/// Fail unless `filosign init` has been run.
pub fn require_project() -> Result<&'static Path> {
    let dir = project_dir();
    if !dir.exists() {
        return Err(FilosignError::InvalidConfig {
            detail: "FiloSign not initialized. Run 'filosign init' first.".into(),
        });
    }
    Ok(dir)
}

/// Public key service backed by the project's file store and config.
pub fn key_service() -> Result<PublicKeyService<FileKeyValueStore, Secp256k1Recovery>> {
    let dir = require_project()?;
    let config = AppConfig::load_or_default(dir)?;
    let store = FileKeyValueStore::new(dir.to_path_buf());

    Ok(PublicKeyService {
        cache: KeyDiscoveryCache::with_settings(
            store,
            &config.cache.storage_key,
            config.cache.ttl_days,
        ),
        recovery: Secp256k1Recovery::new(),
    })
}

pub fn document_service() -> DualAccessEncryption<Secp256k1Backend> {
    DualAccessEncryption {
        cipher: Secp256k1Backend::new(),
    }
}
