pub mod commands;
pub mod context;
pub mod logging;
pub mod output;

use clap::{Parser, Subcommand};

/// Share a document between two wallets without storing either address.
#[derive(Parser, Debug)]
#[command(name = "filosign", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project directory holding config, key cache and audit log
    #[arg(long, global = true, env = "FILOSIGN_DIR", default_value = ".filosign")]
    pub dir: String,

    /// Wallet key file (default: <config dir>/filosign/wallet.key)
    #[arg(long, global = true, env = "FILOSIGN_WALLET")]
    pub wallet: Option<String>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize FiloSign in the current project
    Init,

    /// Manage the local wallet used for signing and opening documents
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },

    /// Discover and manage cached public keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Encrypt a document so that exactly two parties can open it
    Seal {
        /// Document to encrypt
        file: String,
        /// First party: wallet address (cached key) or 0x04… public key
        #[arg(long)]
        party_a: String,
        /// Second party: wallet address (cached key) or 0x04… public key
        #[arg(long)]
        party_b: String,
        /// Where to write the sealed document (default: <file>.filosign.json)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Decrypt a sealed document with the local wallet
    Open {
        /// Sealed document (JSON)
        file: String,
        /// Where to write the plaintext (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show operation history
    Log {
        /// Filter entries since this date (ISO 8601)
        #[arg(long)]
        since: Option<String>,
        /// Show last N entries
        #[arg(long)]
        last: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum WalletAction {
    /// Generate a wallet key file if none exists
    Setup,
    /// Print the wallet address and public key
    Show,
}

#[derive(Subcommand, Debug)]
pub enum KeysAction {
    /// Prove ownership of an address by signing, then cache its public key
    Discover {
        /// Address to discover (default: the local wallet's address)
        #[arg(long)]
        address: Option<String>,
    },
    /// Cache a known public key for an address
    Add {
        /// Wallet address
        address: String,
        /// Uncompressed public key (0x04…)
        public_key: String,
    },
    /// Print the cached public key for an address
    Show {
        /// Wallet address
        address: String,
    },
    /// List cached public keys
    List,
    /// Remove the cached key for an address
    Remove {
        /// Wallet address
        address: String,
    },
    /// Remove every cached key
    Clear,
}
