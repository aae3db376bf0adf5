use std::process::ExitCode;

use clap::Parser;
use notifier::app::{self, Command, Endpoints};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Send stock price summaries to a Telegram chat.
#[derive(Parser)]
#[command(name = "stock-notifier", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let lookup = |name: &str| std::env::var(name).ok();

    match app::run(cli.command, lookup, &Endpoints::default()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}
