use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::time::Duration;

use crate::advisor_client::{AdvisorClient, AdvisorReply};
use crate::cli::Args;
use crate::output::{print_advice, print_field_errors, print_optimization_failed};

/// Outcome of one CLI run, mapped onto the process exit code by `main`
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Advised,
    InvalidInput,
    Unavailable,
}

/// Validates the offer, asks the daemon for advice and prints it
pub async fn run_optimize(args: &Args, client: &AdvisorClient) -> Result<RunOutcome> {
    let form = args.offer_form();
    if let Err(errors) = form.validate() {
        print_field_errors(&errors);
        return Ok(RunOutcome::InvalidInput);
    }

    let mut query = form.route_query()?;
    if let Some(demographics) = &args.demographics {
        query = query.with_rider_demographics(demographics.clone());
    }
    if let Some(history) = &args.history {
        query = query.with_historical_ride_data(history.clone());
    }
    info!(
        "Optimizing {} ride from {} to {} ({} stops)",
        form.transport_mode,
        query.start_location,
        query.end_location,
        query.stops.len()
    );

    // Display a spinner while waiting for response
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message("Asking the route advisor...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let reply = client.optimize(&query).await;
    spinner.finish_and_clear();

    match reply? {
        AdvisorReply::Advice(advice) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&advice)?);
            } else {
                print_advice(&advice);
            }
            Ok(RunOutcome::Advised)
        }
        AdvisorReply::Rejected { field, error } => {
            error!("Advisor rejected query: {:?} {}", field, error);
            let field = field.unwrap_or_else(|| "request".to_string());
            eprintln!("{}: {}", field, error);
            Ok(RunOutcome::InvalidInput)
        }
        AdvisorReply::Unavailable(message) => {
            print_optimization_failed(&message);
            Ok(RunOutcome::Unavailable)
        }
    }
}
