use clap::Parser;
use dotenv::dotenv;
use std::process::ExitCode;

mod advisor_client;
mod app;
mod cli;
mod logging;
mod output;

use crate::advisor_client::AdvisorClient;
use crate::app::RunOutcome;
use crate::cli::Args;
use crate::logging::{log_error, log_info};

/// Main function - Validates the ride offer and asks the advisor daemon for pooling advice
#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables (POOLING_ADVISOR_URL, RUST_LOG)
    dotenv().ok();

    // Parse command-line arguments
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let client = match AdvisorClient::new(&args.daemon_url) {
        Ok(client) => client,
        Err(e) => {
            log_error(&format!("Failed to initialize advisor client: {}", e));
            return ExitCode::from(2);
        }
    };

    match app::run_optimize(&args, &client).await {
        Ok(RunOutcome::Advised) => {
            log_info("Route advice delivered");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::InvalidInput) => ExitCode::from(2),
        Ok(RunOutcome::Unavailable) => ExitCode::from(3),
        Err(e) => {
            log_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
