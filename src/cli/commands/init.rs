use crate::adapters::key_stores::file_key_value_store::FileKeyValueStore;
use crate::cli::context;
use crate::cli::output;
use crate::config::app_config::DEFAULT_CONFIG;
use crate::core::errors::{FilosignError, Result};
use crate::core::models::audit_entry::AuditAction;
use crate::core::services::key_cache::DEFAULT_STORAGE_KEY;
use crate::core::traits::key_value_store::KeyValueStore;

/// Execute the `filosign init` command.
///
/// Creates the project directory with a default `config.toml` and an
/// empty key cache.
pub fn execute() -> Result<()> {
    let dir = context::project_dir();

    if dir.exists() {
        return Err(FilosignError::InvalidConfig {
            detail: format!(
                "FiloSign is already initialized in this project ({} exists)",
                dir.display()
            ),
        });
    }

    output::header("FiloSign: initializing project");

    std::fs::create_dir_all(dir)?;
    output::success(&format!("Created {}/", dir.display()));

    std::fs::write(dir.join("config.toml"), DEFAULT_CONFIG)?;
    output::success("Generated config.toml with defaults");

    FileKeyValueStore::new(dir.to_path_buf()).write(DEFAULT_STORAGE_KEY, "{}")?;
    output::success(&format!("Created empty key cache ({DEFAULT_STORAGE_KEY}.json)"));

    match context::load_wallet() {
        Ok(wallet) => output::success(&format!("Wallet found: {}", wallet.address())),
        Err(_) => {
            output::warning("No wallet found");
            println!("  Run 'filosign wallet setup' to create one.");
        }
    }

    super::audit_helpers::log_audit(AuditAction::Init, Some("project initialized".into()));
    Ok(())
}
