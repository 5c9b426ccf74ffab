// Searchgate - Main Entry Point
//
// Runs the gateway core: the rate-limit query surface and the credential
// pool wiring. Also ships small utilities for provisioning (deploy-time
// key and admin token generation).

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use searchgate::config::Config;
use searchgate::crypto;
use searchgate::rate_limit::{FileRateStore, MemoryRateStore, RateLimiter, RateStateStore};
use searchgate::server::{self, AppState};

/// Searchgate: admission control and credential pool for a search gateway
#[derive(Parser, Debug)]
#[command(name = "searchgate")]
#[command(version = "0.1.0")]
#[command(about = "Rate admission and provider credential core", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP surface
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a base64 encryption key for SEARCHGATE_ENCRYPTION_KEY
    GenerateKey,
    /// Generate a random hex admin token for SEARCHGATE_ADMIN_TOKEN
    GenerateToken,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level.to_string())),
        )
        .init();

    match args.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(port).await,
        Commands::GenerateKey => {
            let mut key = [0u8; crypto::KEY_LENGTH];
            getrandom::getrandom(&mut key).context("Failed to gather key material")?;
            println!("{}", BASE64.encode(key));
            Ok(())
        }
        Commands::GenerateToken => {
            let token = crypto::generate_token(crypto::DEFAULT_TOKEN_LENGTH)
                .context("Failed to generate token")?;
            println!("{token}");
            Ok(())
        }
    }
}

async fn serve(port_override: Option<u16>) -> Result<()> {
    let config = Config::from_env().context("Configuration error")?;

    let rate_store: Arc<dyn RateStateStore> = match &config.state_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "using file-backed rate state");
            Arc::new(FileRateStore::new(dir).context("Failed to open state directory")?)
        }
        None => {
            info!("using in-memory rate state");
            Arc::new(MemoryRateStore::new())
        }
    };

    let state = AppState {
        limiter: RateLimiter::new(rate_store),
        admin_token: config.admin_token.clone(),
        default_limit: config.rate_limit,
        default_window_ms: config.rate_window_ms,
    };

    let port = port_override.unwrap_or(config.listen_port);
    server::serve(state, port).await
}
