mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    cli::logging::init(args.verbose);
    cli::context::init(&args.dir, args.wallet.as_deref());

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(),
        Commands::Wallet { action } => cli::commands::wallet::execute(action),
        Commands::Keys { action } => cli::commands::keys::execute(action),
        Commands::Seal {
            file,
            party_a,
            party_b,
            output,
        } => cli::commands::seal::execute(file, party_a, party_b, output.as_deref()),
        Commands::Open { file, output } => cli::commands::open::execute(file, output.as_deref()),
        Commands::Log { since, last } => cli::commands::log::execute(since.as_deref(), *last),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
