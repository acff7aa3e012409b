use clap::Parser;
use pooling_core::{OfferForm, TransportMode};

/// Offer a ride and ask the route pooling advisor how to pick up more riders
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Where the ride starts
    #[arg(long = "from")]
    pub start_location: String,

    /// Where the ride ends
    #[arg(long = "to")]
    pub end_location: String,

    /// Comma-separated stops along the way, in travel order
    #[arg(long)]
    pub stops: Option<String>,

    /// Seats offered
    #[arg(long, default_value_t = 1)]
    pub seats: u8,

    /// Mode of transport (car or bike)
    #[arg(long, default_value = "car")]
    pub mode: TransportMode,

    /// Fare per seat
    #[arg(long, default_value_t = 0.0)]
    pub fare: f64,

    /// What is known about riders in the area
    #[arg(long)]
    pub demographics: Option<String>,

    /// Past ride requests and pooling success in the area
    #[arg(long)]
    pub history: Option<String>,

    /// Base URL of the advisor daemon
    #[arg(long, env = "POOLING_ADVISOR_URL", default_value = "http://127.0.0.1:8080")]
    pub daemon_url: String,

    /// Print the advice as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    pub fn offer_form(&self) -> OfferForm {
        OfferForm {
            start_location: self.start_location.clone(),
            end_location: self.end_location.clone(),
            stops: self.stops.clone(),
            seats: self.seats,
            transport_mode: self.mode,
            fare: self.fare,
        }
    }
}
