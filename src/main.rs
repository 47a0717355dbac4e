use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// REST backend for class selection, payment and enrollment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Directory for the database file (overrides DATA_PATH)
    #[arg(long)]
    data_path: Option<String>,

    /// Keep all data in memory; nothing is written to disk
    #[arg(long)]
    in_memory: bool,
}

mod config;
mod error;
mod gateway;
mod managers;
mod models;
mod state;
mod web;

use config::ServerConfig;
use gateway::{PaymentGateway, StripeGateway};
use managers::create_shared_token_service;
use state::{create_shared_store, Store};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data_path) = args.data_path {
        config.data_path = data_path.into();
    }
    config.in_memory = args.in_memory;

    let store = if config.in_memory {
        warn!("--in-memory: data will not be persisted");
        Store::in_memory()
    } else {
        // Ensure state directory exists
        tokio::fs::create_dir_all(&config.data_path).await.ok();
        info!("Loading database...");
        Store::open(config.database_file()).await?
    };
    let store = create_shared_store(store);

    let tokens = create_shared_token_service(&config.token_secret, config.token_ttl_secs);

    let gateway: Option<Arc<dyn PaymentGateway>> = match StripeGateway::from_env() {
        Some(gateway) => {
            info!("Payment gateway at {}", gateway.api_base);
            Some(Arc::new(gateway))
        }
        None => {
            warn!("Payment intents disabled: PAYMENT_SECRET_KEY not set");
            None
        }
    };

    let state = web::AppState::new(store, tokens, gateway);
    web::start_web_server(config.port, state).await?;

    warn!("Server ended.");
    Ok(())
}
