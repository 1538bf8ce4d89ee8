use crate::adapters::wallet::local_wallet::LocalWallet;
use crate::cli::WalletAction;
use crate::cli::context;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;

/// Execute the `filosign wallet` command.
pub fn execute(action: &WalletAction) -> Result<()> {
    match action {
        WalletAction::Setup => execute_setup(),
        WalletAction::Show => execute_show(),
    }
}

/// Generate a wallet unless one already exists.
fn execute_setup() -> Result<()> {
    let path = context::wallet_path()?;

    if path.exists() {
        let wallet = LocalWallet::load(&path)?;
        output::success(&format!("Wallet already exists at {}", path.display()));
        print_identity(&wallet);
        return Ok(());
    }

    let wallet = LocalWallet::generate();
    wallet.save(&path)?;

    output::success(&format!("Wallet created at {}", path.display()));
    print_identity(&wallet);
    println!("\n  Next step: publish your key with 'filosign keys discover'.");

    super::audit_helpers::log_audit(
        AuditAction::WalletSetup,
        Some(format!("created {}", wallet.address())),
    );
    Ok(())
}

fn execute_show() -> Result<()> {
    let wallet = context::load_wallet()?;
    output::header("Local wallet");
    print_identity(&wallet);
    Ok(())
}

fn print_identity(wallet: &LocalWallet) {
    output::field("Address", wallet.address().as_str());
    output::field("Public key", &wallet.public_key().to_hex());
}
