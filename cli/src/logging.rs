use colored::*;

// Terminal-facing messages; diagnostics go through the `log` crate

pub fn log_info(message: &str) {
    log::info!("{}", message);
}

pub fn log_error(message: &str) {
    log::error!("{}", message);
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}
