use colored::Colorize;

use crate::cli::KeysAction;
use crate::cli::context;
use crate::cli::output;
use crate::core::errors::{FilosignError, Result};
use crate::core::models::audit_entry::AuditAction;

use super::audit_helpers::log_audit;

/// Execute the `filosign keys` command.
pub fn execute(action: &KeysAction) -> Result<()> {
    match action {
        KeysAction::Discover { address } => execute_discover(address.as_deref()),
        KeysAction::Add {
            address,
            public_key,
        } => execute_add(address, public_key),
        KeysAction::Show { address } => execute_show(address),
        KeysAction::List => execute_list(),
        KeysAction::Remove { address } => execute_remove(address),
        KeysAction::Clear => execute_clear(),
    }
}

/// Sign a discovery message with the local wallet and cache the
/// recovered key.
///
/// `--address` lets the user claim another address; the signature check
/// rejects it unless the local wallet owns it.
fn execute_discover(address: Option<&str>) -> Result<()> {
    let service = context::key_service()?;
    let wallet = context::load_wallet()?;

    let target = match address {
        Some(a) => a.to_string(),
        None => wallet.address().to_string(),
    };

    let public_key = service.discover_public_key(&target, |msg| wallet.sign_message(msg))?;

    output::success(&format!("Public key available for {}", target.to_lowercase()));
    output::field("Public key", &public_key.to_hex());

    log_audit(AuditAction::Discover, Some(target.to_lowercase()));
    Ok(())
}

fn execute_add(address: &str, public_key: &str) -> Result<()> {
    let service = context::key_service()?;
    service.cache_public_key(address, public_key)?;

    output::success(&format!("Cached public key for {}", address.to_lowercase()));
    log_audit(AuditAction::KeyAdd, Some(address.to_lowercase()));
    Ok(())
}

fn execute_show(address: &str) -> Result<()> {
    let service = context::key_service()?;
    match service.get_public_key(address)? {
        Some(key) => {
            println!("{key}");
            Ok(())
        }
        None => Err(FilosignError::KeyNotCached {
            address: address.to_lowercase(),
        }),
    }
}

fn execute_list() -> Result<()> {
    let service = context::key_service()?;
    let entries = service.cache.entries()?;

    if entries.is_empty() {
        output::warning("No public keys cached");
        println!("  Run 'filosign keys discover' to publish your own key.");
        return Ok(());
    }

    output::header(&format!("Cached public keys ({}):", entries.len()));
    for (address, entry) in &entries {
        let when = entry
            .discovered_at()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "?".to_string());
        let short_key = format!("{}…", &entry.public_key[..18.min(entry.public_key.len())]);
        println!("  {} {}  {}", address, short_key.dimmed(), when.dimmed());
    }
    Ok(())
}

fn execute_remove(address: &str) -> Result<()> {
    let service = context::key_service()?;
    service.remove_cached_key(address)?;

    output::success(&format!("Removed cached key for {}", address.to_lowercase()));
    log_audit(AuditAction::KeyRemove, Some(address.to_lowercase()));
    Ok(())
}

fn execute_clear() -> Result<()> {
    let service = context::key_service()?;
    service.clear_all_cached_keys()?;

    output::success("Cleared all cached public keys");
    log_audit(AuditAction::KeyClear, None);
    Ok(())
}
