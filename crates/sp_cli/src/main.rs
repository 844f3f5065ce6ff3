use std::process::ExitCode;

use clap::Parser;
use sp_core::{Error, Secrets};
use sp_scrappers::{handle_command, init_logging, PlannerCommands};
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plans SEO articles from the top search results for a keyword", long_about = None)]
pub struct Cli {
    /// Default log filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: PlannerCommands,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Values already in the environment win over .env
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let logger = init_logging(&cli.log_level);
    if let Ok(path) = dotenv {
        logger.debug(&format!("Loaded environment from {}", path.display()));
    }

    match handle_command(cli.command, Secrets::from_env()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::NoResults(reason)) => {
            error!("🤷 Nothing to analyse: {}", reason);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
