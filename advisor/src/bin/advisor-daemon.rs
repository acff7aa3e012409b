use clap::Parser;
use pooling_advisor::config::AppConfig;
use pooling_advisor::http_server;
use pooling_core::{GeminiClient, RoutePoolingAdvisor};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "advisor-daemon", about = "Route pooling advisor HTTP daemon")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gemini API key
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Gemini model to use
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// HTTP server address
    #[arg(long)]
    http_addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    info!("Starting route pooling advisor daemon");

    // Parse command line args
    let args = Args::parse();

    // Load config from file or use defaults
    let mut config = if let Some(config_path) = &args.config {
        match AppConfig::load_from_file(config_path) {
            Ok(cfg) => {
                info!("Loaded configuration from {}", config_path.display());
                cfg
            }
            Err(e) => {
                error!("Failed to load configuration from {}: {}", config_path.display(), e);
                return Err(anyhow::anyhow!("Configuration error: {}", e));
            }
        }
    } else {
        match AppConfig::load_from_default() {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                return Err(anyhow::anyhow!("Configuration error: {}", e));
            }
        }
    };

    // Environment (and .env) overrides the file, CLI args override both
    config.gemini = config.gemini.with_env_overrides();

    if let Some(api_key) = args.api_key {
        config.gemini.api_key = Some(api_key);
    }
    if let Some(model) = args.model {
        config.gemini.model_name = Some(model);
    }
    if let Some(http_addr) = args.http_addr {
        config.http_addr = http_addr;
    }

    // Initialize Gemini client
    let gemini_client = match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => {
            info!("Initialized Gemini client");
            client
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Gemini client");
            return Err(anyhow::anyhow!("Failed to initialize Gemini client: {}", e));
        }
    };

    let advisor = RoutePoolingAdvisor::new(Arc::new(gemini_client));
    info!(model = advisor.model_name(), "Advisor ready");

    http_server::run_server(advisor, config.http_addr).await?;

    info!("Route pooling advisor daemon shutting down");
    Ok(())
}
