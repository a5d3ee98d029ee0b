use clap::Parser;
use keyvault::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::List => cli::keys::list().await,
        Command::Classify(args) => cli::keys::classify_value(args),
    }
}
