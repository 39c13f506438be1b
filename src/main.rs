//! Enterprise Lookup CLI application
//!
//! Command-line client for the enterprise-lookup service: faceted search,
//! export quota management, and membership checkout.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use entlookup::cli::{handle_checkout, handle_export, handle_search, Cli, Commands};
use entlookup::config::AppConfig;
use entlookup::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok(); // Ignore errors if file doesn't exist

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(&cli);

    info!("entlookup v{} starting", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(cli.global.config.clone()).await?;

    // Execute the appropriate command
    match cli.command {
        Commands::Search(args) => {
            info!("Executing search command");
            handle_search(args, &config).await
        }
        Commands::Export(args) => {
            info!("Executing export command");
            handle_export(args, &config).await
        }
        Commands::Checkout(args) => {
            info!("Executing checkout command");
            handle_checkout(args, &config).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("entlookup={}", log_level).parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();
}
