use chrono::{NaiveDate, TimeZone, Utc};
use colored::Colorize;

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::cli::context;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{FilosignError, Result};
use crate::core::models::audit_entry::{AuditAction, AuditEntry};
use crate::core::traits::audit::AuditLogger;

/// Execute the `filosign log` command.
pub fn execute(since: Option<&str>, last: Option<usize>) -> Result<()> {
    let dir = context::require_project()?;

    let config = AppConfig::load(dir)?;
    let logger = JsonAuditLogger::from_config(dir, config.audit.as_ref());

    let since_dt = since.map(parse_since).transpose()?;
    let entries = logger.query(since_dt)?;

    if entries.is_empty() {
        output::header("filosign log");
        output::warning("No audit entries found");
        if since.is_some() {
            println!("  Try removing --since to see all entries.");
        }
        return Ok(());
    }

    let skip = last.map(|n| entries.len().saturating_sub(n)).unwrap_or(0);
    let display = &entries[skip..];

    output::header(&format!("filosign log ({} entries)", display.len()));
    println!();

    for entry in display {
        print_entry(entry);
    }

    Ok(())
}

/// Parse `YYYY-MM-DD` as midnight UTC.
fn parse_since(s: &str) -> Result<chrono::DateTime<Utc>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| FilosignError::InvalidConfig {
            detail: format!(
                "Invalid date format: '{s}'. Expected ISO 8601 (YYYY-MM-DD), e.g. 2026-01-15"
            ),
        })
        .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).expect("midnight is always valid")))
}

fn print_entry(entry: &AuditEntry) {
    let date = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
    let detail = entry.detail.as_deref().unwrap_or("—");

    println!(
        "  {} {} {:<14} {} {}",
        date.to_string().dimmed(),
        "│".dimmed(),
        format_action(&entry.action),
        detail,
        entry.actor.dimmed(),
    );
}

fn format_action(action: &AuditAction) -> String {
    let label = action.to_string();
    match action {
        AuditAction::Init | AuditAction::WalletSetup => label.cyan().to_string(),
        AuditAction::Discover | AuditAction::KeyAdd => label.green().to_string(),
        AuditAction::KeyRemove | AuditAction::KeyClear => label.red().to_string(),
        AuditAction::Seal => label.yellow().to_string(),
        AuditAction::Open => label.blue().to_string(),
    }
}
