use colored::*;
use pooling_core::{FieldError, RouteAdvice};

/// Format route advice for the terminal
pub fn format_advice(advice: &RouteAdvice) -> String {
    match advice {
        RouteAdvice::Suggestion {
            suggested_route_modifications,
            expected_impact,
            justification,
        } => format!(
            "{}\n\n{}\n  {}\n\n{}\n  {}\n\n{}\n  {}\n",
            "AI Route Suggestion".blue().bold(),
            "Suggested Modifications:".cyan(),
            suggested_route_modifications,
            "Expected Impact:".cyan(),
            expected_impact,
            "Justification:".cyan(),
            justification
        ),
        RouteAdvice::NoSuggestion { justification } => format!(
            "{}\n  No significant pooling improvements could be found for this route.\n  {}\n",
            "Route is Already Optimal".green().bold(),
            justification
        ),
    }
}

pub fn print_advice(advice: &RouteAdvice) {
    println!("{}", format_advice(advice));
}

/// Print form validation failures, one per line
pub fn print_field_errors(errors: &[FieldError]) {
    eprintln!("{}", "Please fix the following:".yellow().bold());
    for error in errors {
        eprintln!("  {} {}", "-".yellow(), error);
    }
}

/// Print the failure banner shown when no advice could be obtained
pub fn print_optimization_failed(message: &str) {
    eprintln!("{}", "Optimization Failed".red().bold());
    eprintln!("  Could not get AI suggestions. Please try again.");
    eprintln!("  {}", message.dimmed());
}
