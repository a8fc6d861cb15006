use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use commands::Cli;
use config::AppConfig;
use models::DataSource;

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    for directive in ["st13=info", "reqwest=warn", "hyper=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    info!("Starting st13 v{}", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    match commands::chart::execute(cli, &config).await {
        Ok(outcome) => {
            let origin = match outcome.source {
                DataSource::Provider => "market data",
                DataSource::Synthetic => "sample data",
            };
            info!(
                "Chart \"{}\" of {} candles ({}) written to {}",
                outcome.caption,
                outcome.candles,
                origin,
                outcome.path.display()
            );
        }
        Err(e) => {
            error!("{}", utils::extract_clean_error(&e.to_string()));
            std::process::exit(1);
        }
    }
}
