use serde::Deserialize;
use std::path::Path;

use crate::core::errors::{FilosignError, Result};
use crate::core::models::cached_key::{CACHE_TTL_DAYS, MAX_CACHE_TTL_DAYS};
use crate::core::services::key_cache::DEFAULT_STORAGE_KEY;

/// Top-level FiloSign configuration read from `.filosign/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub filosign: FilosignSection,
    #[serde(default)]
    pub cache: CacheSection,
    pub audit: Option<AuditSection>,
}

/// Current format version supported by this build of FiloSign.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// Contents written by `filosign init`.
pub const DEFAULT_CONFIG: &str = r#"[filosign]
version = "0.1.0"
format_version = 1

[cache]
storage_key = "filosign_public_keys"
ttl_days = 30

[audit]
enabled = true
log_file = "audit.log"
"#;

impl AppConfig {
    /// Load the configuration from `{dir}/config.toml`.
    ///
    /// After parsing, validates file names taken from the config so a
    /// tampered file cannot point the cache or audit log outside `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join("config.toml");
        if !config_path.exists() {
            return Err(FilosignError::InvalidConfig {
                detail: "config.toml not found. Run 'filosign init' first.".into(),
            });
        }
        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| FilosignError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.filosign.format_version > CURRENT_FORMAT_VERSION {
            return Err(FilosignError::FormatVersionTooNew {
                project_version: config.filosign.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }

        validate_simple_filename(&config.cache.storage_key, "cache storage key")?;
        if !(1..=MAX_CACHE_TTL_DAYS).contains(&config.cache.ttl_days) {
            return Err(FilosignError::InvalidConfig {
                detail: format!(
                    "cache.ttl_days must be between 1 and {MAX_CACHE_TTL_DAYS}, got {}",
                    config.cache.ttl_days
                ),
            });
        }

        if let Some(audit) = &config.audit {
            validate_simple_filename(&audit.log_file, "audit log file")?;
        }

        Ok(config)
    }

    /// Load when present, otherwise fall back to built-in defaults.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        if dir.join("config.toml").exists() {
            Self::load(dir)
        } else {
            Self::parse(DEFAULT_CONFIG)
        }
    }
}

/// The `[filosign]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FilosignSection {
    pub version: String,
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
}

fn default_format_version() -> u32 {
    1
}

/// The `[cache]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            ttl_days: default_ttl_days(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_ttl_days() -> i64 {
    CACHE_TTL_DAYS
}

/// The `[audit]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditSection {
    pub enabled: bool,
    pub log_file: String,
}

/// Reject names that could escape the project directory.
pub fn validate_simple_filename(name: &str, what: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0');
    if ok {
        Ok(())
    } else {
        Err(FilosignError::InvalidConfig {
            detail: format!("Invalid {what} '{name}': must be a plain file name"),
        })
    }
}
